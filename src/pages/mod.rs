pub mod blog_detail;
pub mod blog_form;
pub mod blogs;
pub mod contact;
pub mod dashboard;
pub mod edit_profile;
pub mod home;
pub mod login;

/// Current wall-clock time in unix seconds, from the host clock.
pub(crate) fn now_secs() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}
