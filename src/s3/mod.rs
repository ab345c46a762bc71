pub mod client;
pub mod listing;
pub mod prefix;
pub mod store;

#[cfg(test)]
pub(crate) mod fake;

pub use client::create_s3_client;
pub use listing::{delete_keys, list_all_common_prefixes, list_all_keys, list_common_prefixes};
pub use prefix::{DELIMITER, directory_prefix, prefix_from_path, topic_timestamp};
pub use store::{ListPage, ObjectStore, S3Store};
