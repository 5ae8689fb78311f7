//! Sentence embedding for Korean text.
//!
//! Loads a BERT checkpoint (default `ko-sbert-nli`) with Candle and returns the
//! pooled `[CLS]` representation of each input. Inputs are truncated to
//! `max_len` tokens before inference.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use casevec_core::config::{expand_path, ServerSettings};
pub use casevec_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use pool::{cls_token, BertPooler};

pub struct BertEmbedder { model: BertModel, pooler: BertPooler, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize }

impl BertEmbedder {
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        tokenize::configure_truncation(&mut tokenizer, max_len)?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights = load_weights(model_dir, &device)?;
        let vb = VarBuilder::from_tensors(weights, DType::F32, &device);
        let model = BertModel::load(vb.clone(), &config)?;
        let pooler = BertPooler::load(&vb, config.hidden_size)?;
        info!(dim = config.hidden_size, max_len, "embedding model loaded");
        Ok(Self { model, pooler, tokenizer, device, dim: config.hidden_size, max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, token_type_ids, attention_mask) = tokenize::tokenize_on_device(&self.tokenizer, text, &self.device)?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = self.pooler.forward(&hidden)?;
        let v: Vec<f32> = pooled.to_dtype(DType::F32)?.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if v.len() != self.dim { return Err(anyhow!("dim mismatch: got {} expected {}", v.len(), self.dim)); }
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 500 { warn!(ms = elapsed.as_millis() as u64, "slow embedding"); } else { debug!(ms = elapsed.as_millis() as u64, "embedded text"); }
        Ok(v)
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed(&self, text: &str) -> Result<Vec<f32>> { self.embed_text(text) }
}

/// Prefer `model.safetensors`; fall back to a PyTorch `pytorch_model.bin`.
fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let st = model_dir.join("model.safetensors");
    if st.exists() {
        debug!(path = %st.display(), "reading safetensors weights");
        return Ok(candle_core::safetensors::load(&st, device)?);
    }
    let bin = model_dir.join("pytorch_model.bin");
    if bin.exists() {
        debug!(path = %bin.display(), "reading pickle weights");
        let weights = candle_core::pickle::read_all(&bin)?;
        let mut map = HashMap::with_capacity(weights.len());
        for (name, t) in weights { map.insert(name, t.to_device(device)?); }
        return Ok(map);
    }
    Err(anyhow!("no model.safetensors or pytorch_model.bin under {}", model_dir.display()))
}

/// Hash-based embedder for tests and development without model weights.
pub struct FakeEmbedder { dim: usize, max_len: usize }

impl FakeEmbedder { pub fn new(dim: usize) -> Self { Self { dim, max_len: 128 } } }

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher}; use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().take(self.max_len).enumerate() { let mut hasher = XxHash64::with_seed(0); token.hash(&mut hasher); let h = hasher.finish(); let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32); v[idx] += val + (i as f32 % 3.0) * 0.01; }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6); for x in &mut v { *x /= norm; } Ok(v)
    }
}

pub const FAKE_DIM: usize = 768;

pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

pub fn get_default_embedder(settings: &ServerSettings) -> Result<Box<dyn Embedder>> {
    if use_fake_embeddings() { info!("using FakeEmbedder"); return Ok(Box::new(FakeEmbedder::new(FAKE_DIM))); }
    let dir = resolve_model_dir(&settings.model_dir)?;
    Ok(Box::new(BertEmbedder::load(&dir, settings.max_tokens)?))
}

fn resolve_model_dir(configured: &str) -> Result<PathBuf> {
    let p = expand_path(configured); if p.exists() { return Ok(p); }
    if let Ok(dir) = std::env::var("MODEL_DIR") { let p = expand_path(&dir); if p.exists() { info!(dir = %p.display(), "using MODEL_DIR"); return Ok(p); } }
    Err(anyhow!("Could not locate embedding model directory '{}'", configured))
}
