//! Fixed question template driving capture and formatting

/// One question asked during capture and the section it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateItem {
    pub prompt: &'static str,
    pub section_title: &'static str,
}

impl TemplateItem {
    pub const fn new(prompt: &'static str, section_title: &'static str) -> Self {
        TemplateItem {
            prompt,
            section_title,
        }
    }
}

/// The daily template, in the order questions are asked and sections are written
pub const DAILY_TEMPLATE: [TemplateItem; 4] = [
    TemplateItem::new("What did you do today?", "What I Did"),
    TemplateItem::new("What's next on your plate?", "What's Next"),
    TemplateItem::new("What broke or got weird?", "What Broke or Got Weird"),
    TemplateItem::new("Any other notes? (optional)", "Notes"),
];
