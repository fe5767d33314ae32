use maud::{html, Markup, Render};

/// Round profile picture, or the first letter of the name when the user has
/// no image.
#[derive(Debug, Clone)]
pub struct ProfilePhoto<'a> {
    image: Option<&'a str>,
    name: &'a str,
    large: bool,
}

impl<'a> ProfilePhoto<'a> {
    #[must_use]
    pub const fn new(image: Option<&'a str>, name: &'a str) -> Self {
        Self {
            image,
            name,
            large: false,
        }
    }

    #[must_use]
    pub const fn large(mut self) -> Self {
        self.large = true;
        self
    }

    fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
    }
}

impl Render for ProfilePhoto<'_> {
    fn render(&self) -> Markup {
        let class = if self.large { "avatar avatar-large" } else { "avatar" };
        let image = self.image.filter(|s| !s.is_empty());

        html! {
            @if let Some(src) = image {
                img class=(class) src=(src) alt=(self.name) title=(self.name);
            } @else {
                span class=(format!("{class} avatar-placeholder")) title=(self.name) {
                    (self.initial())
                }
            }
        }
    }
}

/// The `+N` bubble shown after the visible member avatars.
#[derive(Debug, Clone, Copy)]
pub struct MoreMembers(pub usize);

impl Render for MoreMembers {
    fn render(&self) -> Markup {
        html! {
            @if self.0 > 0 {
                span class="avatar avatar-more" { "+" (self.0) }
            }
        }
    }
}
