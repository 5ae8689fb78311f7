use anyhow::{Result, anyhow};
use candle_core::{Device, Tensor};
use tokenizers::{Tokenizer, TruncationParams};

/// Cap encodings at `max_len` tokens, special tokens included.
pub fn configure_truncation(tokenizer: &mut Tokenizer, max_len: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
    tokenizer.with_padding(None);
    Ok(())
}

/// Encode a single text into `(input_ids, token_type_ids, attention_mask)`, each `[1, T]`.
pub fn tokenize_on_device(tokenizer: &Tokenizer, text: &str, device: &Device) -> Result<(Tensor, Tensor, Tensor)> {
    let enc = tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let input_ids = Tensor::new(enc.get_ids(), device)?.unsqueeze(0)?;
    let token_type_ids = Tensor::new(enc.get_type_ids(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(enc.get_attention_mask(), device)?.unsqueeze(0)?;
    Ok((input_ids, token_type_ids, attention_mask))
}
