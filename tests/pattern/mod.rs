mod next;
mod parse;
