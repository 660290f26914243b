/// A public form feeding the subscription intake. Each one tags its records and greets new
/// subscribers in its own way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeChannel {
    pub default_source: &'static str,
    pub note: Option<&'static str>,
    pub subscribed_message: &'static str,
}

impl IntakeChannel {
    /// Footer and coming soon newsletter forms.
    pub const NEWSLETTER: IntakeChannel = IntakeChannel {
        default_source: "newsletter",
        note: None,
        subscribed_message: "Thank you for subscribing! We'll notify you when we launch.",
    };

    /// Email capture shown after an arcade game.
    pub const ARCADE: IntakeChannel = IntakeChannel {
        default_source: "arcade",
        note: Some("30-min free consulting via arcade"),
        subscribed_message:
            "Thanks! You'll receive 30 minutes of free consulting. We'll reach out shortly.",
    };
}
