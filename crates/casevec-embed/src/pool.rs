use anyhow::{Result, anyhow};
use candle_core::Tensor;
use candle_nn::{Linear, Module, VarBuilder};

/// Hidden state of the first (`[CLS]`) token: `[B,T,H] -> [B,H]`.
pub fn cls_token(hidden: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    if dims.len() != 3 { return Err(anyhow!("hidden shape must be [B,T,H], got {:?}", dims)); }
    if dims[1] == 0 { return Err(anyhow!("empty token sequence")); }
    Ok(hidden.narrow(1, 0, 1)?.squeeze(1)?)
}

/// BERT pooler head: `tanh(W · h_cls + b)`.
pub struct BertPooler { dense: Linear }

impl BertPooler {
    pub fn new(dense: Linear) -> Self { Self { dense } }

    /// Load `pooler.dense`, falling back to the `bert.`-prefixed checkpoint layout.
    pub fn load(vb: &VarBuilder, hidden_size: usize) -> Result<Self> {
        let dense = candle_nn::linear(hidden_size, hidden_size, vb.pp("pooler.dense"))
            .or_else(|_| candle_nn::linear(hidden_size, hidden_size, vb.pp("bert.pooler.dense")))
            .map_err(|e| anyhow!("checkpoint has no pooler weights: {}", e))?;
        Ok(Self { dense })
    }

    pub fn forward(&self, hidden: &Tensor) -> Result<Tensor> {
        let cls = cls_token(hidden)?;
        Ok(self.dense.forward(&cls)?.tanh()?)
    }
}
