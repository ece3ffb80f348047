//! Choices offered by the generator form: `(wire value, label)`.

pub const PLATFORMS: &[(&str, &str)] = &[
    ("twitter", "X / Twitter"),
    ("instagram", "Instagram"),
    ("linkedin", "LinkedIn"),
    ("facebook", "Facebook"),
    ("tiktok", "TikTok"),
];

pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("post", "Regular Post"),
    ("thread", "Thread"),
    ("caption", "Image Caption"),
    ("blog", "Blog Post"),
];

pub const TONES: &[(&str, &str)] = &[
    ("professional", "Professional"),
    ("casual", "Casual"),
    ("excited", "Excited"),
    ("humorous", "Humorous"),
    ("technical", "Technical"),
];

pub const DEFAULT_PLATFORM: &str = "twitter";
pub const DEFAULT_CONTENT_TYPE: &str = "post";
pub const DEFAULT_TONE: &str = "professional";
