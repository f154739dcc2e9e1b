use askama::Template;

use crate::form::FormSubmission;

/// The submission form, re-rendered with messages when validation fails.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub errors: Vec<Box<str>>,
    pub values: FormSubmission,
}

/// Confirmation page carrying the generated filename.
#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessPage<'a> {
    pub filename: &'a str,
}
