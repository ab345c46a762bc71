use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::s3::store::{ListPage, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub prefix: String,
    pub delimiter: Option<String>,
    pub continuation_token: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Key(String),
    Prefix(String),
}

/// In-memory bucket that pages its listings and records every call.
pub struct MemoryStore {
    keys: Mutex<Vec<String>>,
    page_size: usize,
    list_calls: Mutex<Vec<ListCall>>,
    deleted: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();
        Self {
            keys: Mutex::new(keys),
            page_size: 1000,
            list_calls: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<String>,
    ) -> Result<ListPage> {
        self.list_calls.lock().unwrap().push(ListCall {
            prefix: prefix.to_string(),
            delimiter: delimiter.map(str::to_string),
            continuation_token: continuation_token.clone(),
        });

        let mut entries = Vec::new();
        for key in self.keys.lock().unwrap().iter() {
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };
            match delimiter.and_then(|d| rest.find(d).map(|i| i + d.len())) {
                Some(end) => {
                    let group = Entry::Prefix(format!("{}{}", prefix, &rest[..end]));
                    if !entries.contains(&group) {
                        entries.push(group);
                    }
                }
                None => entries.push(Entry::Key(key.clone())),
            }
        }

        let start = continuation_token
            .map(|token| token.parse::<usize>().unwrap())
            .unwrap_or(0)
            .min(entries.len());
        let total = entries.len();
        let end = (start + self.page_size).min(total);

        let mut page = ListPage::default();
        for entry in entries.drain(start..end) {
            match entry {
                Entry::Key(key) => page.keys.push(key),
                Entry::Prefix(group) => page.common_prefixes.push(group),
            }
        }
        if end < total {
            page.next_continuation_token = Some(end.to_string());
        }
        Ok(page)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.keys.lock().unwrap().retain(|k| k != key);
        Ok(())
    }
}
