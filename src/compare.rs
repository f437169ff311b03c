//! One-way set differences between the two lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::ResultOrder;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Accounts you follow that do not follow you
    pub not_following_back: Vec<String>,
    /// Accounts following you that you do not follow
    pub not_followed_back: Vec<String>,
}

/// Elements of `source` absent from `exclude`, without repeats
fn difference(source: &[String], exclude: &[String], order: ResultOrder) -> Vec<String> {
    let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    let mut result: Vec<String> = source
        .iter()
        .filter(|handle| !excluded.contains(handle.as_str()))
        .filter(|handle| seen.insert(handle.as_str()))
        .cloned()
        .collect();

    if order == ResultOrder::Alphabetical {
        result.sort();
    }
    result
}

pub fn compare(followers: &[String], following: &[String], order: ResultOrder) -> Comparison {
    Comparison {
        not_following_back: difference(following, followers, order),
        not_followed_back: difference(followers, following, order),
    }
}
