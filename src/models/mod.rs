pub mod asset;
pub mod category;
pub mod issue;
pub mod response;
