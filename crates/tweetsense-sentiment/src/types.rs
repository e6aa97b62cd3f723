use serde::Serialize;

/// Binary sentiment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Map a raw classifier class to a label: `1` is positive, anything else
    /// is negative.
    #[must_use]
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one text through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: Label,
    /// Raw class value returned by the classifier.
    pub class: i64,
    /// The string actually handed to the vectorizer.
    pub normalized: String,
}

/// A single fetched post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub text: String,
    /// Canonical link to the post, when the source provides one.
    pub url: Option<String>,
}

/// What a post source found for a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPosts {
    /// At least one post.
    Found(Vec<Post>),
    /// The source answered, but had nothing for this user.
    NoPosts,
}

impl UserPosts {
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        if posts.is_empty() {
            UserPosts::NoPosts
        } else {
            UserPosts::Found(posts)
        }
    }
}

/// A fetched post together with its label.
#[derive(Debug, Clone, Serialize)]
pub struct PostVerdict {
    pub text: String,
    pub url: Option<String>,
    pub label: Label,
}
