mod add;
mod complete;
mod delete;
mod edit;
mod list;
mod skip;
