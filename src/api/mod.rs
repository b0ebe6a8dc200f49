pub mod jira;
pub mod snipe_it;
