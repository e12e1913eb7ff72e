use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoInput {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResult {
    pub text: String,
    pub byte_length: usize,
    pub char_count: usize,
}

/// Return the text untouched, along with its size in bytes and in chars.
pub async fn echo(input: &EchoInput) -> eyre::Result<EchoResult> {
    Ok(EchoResult {
        text: input.text.clone(),
        byte_length: input.text.len(),
        char_count: input.text.chars().count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_bytes_and_chars() {
        let result = echo(&EchoInput {
            text: "grüß 🦀".into(),
        })
        .await
        .unwrap();
        assert_eq!(result.text, "grüß 🦀");
        assert_eq!(result.byte_length, 11);
        assert_eq!(result.char_count, 6);
    }
}
