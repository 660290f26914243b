#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        if !has_email_shape(&email) {
            return Err(format!("{} email is not valid", email));
        }

        Ok(Self(email))
    }
}

/// `local@domain` with a single `@`, no whitespace, and a dot inside the domain with text on
/// both sides. Nothing else about the characters is checked.
fn has_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            let last = domain.len().saturating_sub(1);

            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .char_indices()
                    .any(|(index, c)| c == '.' && index > 0 && index < last)
        }
        None => false,
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
