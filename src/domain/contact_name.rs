use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGHT: usize = 256;

/// Name typed in the contact form. It ends up inside an email subject, so it must be short and
/// not blank.
#[derive(Debug, Clone)]
pub struct ContactName(String);

impl ContactName {
    pub fn parse(name: String) -> Result<ContactName, String> {
        let name = name.trim().to_string();
        let is_empty = name.is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGHT;

        if is_empty {
            return Err(String::from("Name is required."));
        }

        if is_too_long {
            return Err(format!(
                "Name must be at most {} characters long.",
                MAX_CHAR_LENGHT
            ));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
