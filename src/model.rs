//! View models for the entities the backend stores, plus date helpers.

use serde::{Deserialize, Serialize};

/// A published blog post as stored in the `blogs` collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Unix timestamp in seconds.
    pub date: i64,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// A user document from the `users` collection.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
}

/// A comment attached to a blog post.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "blogId")]
    pub blog_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub content: String,
    pub date: i64,
}

/// The authenticated user as reported by the auth endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
}

/// "Jan 5, 2026" style date for detail headers.
pub fn format_date(epoch_secs: i64) -> String {
    match chrono::DateTime::from_timestamp(epoch_secs, 0) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => String::new(),
    }
}

/// Coarse "n units ago" phrasing for card bylines. `now_secs` is passed in so
/// the function stays clock-free.
pub fn format_relative(epoch_secs: i64, now_secs: i64) -> String {
    let delta = now_secs.saturating_sub(epoch_secs);
    if delta < 60 {
        return "just now".to_string();
    }
    let (count, unit) = if delta < 3600 {
        (delta / 60, "minute")
    } else if delta < 86_400 {
        (delta / 3600, "hour")
    } else if delta < 2_592_000 {
        (delta / 86_400, "day")
    } else if delta < 31_536_000 {
        (delta / 2_592_000, "month")
    } else {
        (delta / 31_536_000, "year")
    };
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_absolute_dates() {
        // 2026-01-05 00:00:00 UTC
        assert_eq!(format_date(1_767_571_200), "Jan 5, 2026");
        assert_eq!(format_date(i64::MAX), "");
    }

    #[test]
    fn formats_relative_dates() {
        let now = 1_767_571_200;
        assert_eq!(format_relative(now - 30, now), "just now");
        assert_eq!(format_relative(now - 90, now), "1 minute ago");
        assert_eq!(format_relative(now - 7_200, now), "2 hours ago");
        assert_eq!(format_relative(now - 3 * 86_400, now), "3 days ago");
        assert_eq!(format_relative(now - 40 * 86_400, now), "1 month ago");
    }

    #[test]
    fn blog_round_trips_with_wire_names() {
        let json = r#"{
            "id": "b1",
            "title": "T",
            "content": "C",
            "author": "Ada",
            "userId": "u1",
            "date": 1700000000
        }"#;
        let blog: Blog = serde_json::from_str(json).unwrap();
        assert_eq!(blog.user_id, "u1");
        assert_eq!(blog.thumbnail, None);
        let out = serde_json::to_value(&blog).unwrap();
        assert_eq!(out["userId"], "u1");
    }
}
