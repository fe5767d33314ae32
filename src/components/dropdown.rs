//! Action menus.
//!
//! Menus are plain `<details>` elements, so opening and closing needs no
//! script. Each entry is a button carrying the API endpoint and HTTP method in
//! `data-action`/`data-method`; `static/js/link-actions.js` turns a click into
//! the matching `fetch` call.

use maud::{html, Markup, Render};

/// One entry in a [`Dropdown`].
#[derive(Debug, Clone)]
pub enum DropdownItem {
    /// Sends `method` to `action` when clicked, after an optional confirmation.
    Request {
        label: &'static str,
        action: String,
        method: &'static str,
        confirm: Option<&'static str>,
    },
    /// Opens the `<dialog>` with the given element id.
    Dialog { label: &'static str, target: String },
}

impl DropdownItem {
    #[must_use]
    pub fn request(label: &'static str, method: &'static str, action: impl Into<String>) -> Self {
        Self::Request {
            label,
            action: action.into(),
            method,
            confirm: None,
        }
    }

    /// Ask the user before sending the request.
    #[must_use]
    pub fn confirm(self, message: &'static str) -> Self {
        match self {
            Self::Request {
                label,
                action,
                method,
                ..
            } => Self::Request {
                label,
                action,
                method,
                confirm: Some(message),
            },
            dialog @ Self::Dialog { .. } => dialog,
        }
    }

    #[must_use]
    pub fn dialog(label: &'static str, target: impl Into<String>) -> Self {
        Self::Dialog {
            label,
            target: target.into(),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Request { label, .. } | Self::Dialog { label, .. } => *label,
        }
    }
}

impl Render for DropdownItem {
    fn render(&self) -> Markup {
        match self {
            Self::Request {
                label,
                action,
                method,
                confirm,
            } => html! {
                li {
                    button type="button" class="dropdown-item"
                        data-action=(action) data-method=(method) data-confirm=[*confirm] {
                        (label)
                    }
                }
            },
            Self::Dialog { label, target } => html! {
                li {
                    button type="button" class="dropdown-item" data-dialog=(target) {
                        (label)
                    }
                }
            },
        }
    }
}

/// A "more" button that reveals a list of actions.
#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    items: Vec<DropdownItem>,
}

impl Dropdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item(mut self, item: DropdownItem) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn items(&self) -> &[DropdownItem] {
        &self.items
    }
}

impl Render for Dropdown {
    fn render(&self) -> Markup {
        html! {
            @if !self.items.is_empty() {
                details class="dropdown" {
                    summary class="dropdown-toggle" title="More" aria-label="More" { "\u{22EF}" }
                    ul class="dropdown-menu" {
                        @for item in &self.items {
                            (item)
                        }
                    }
                }
            }
        }
    }
}
