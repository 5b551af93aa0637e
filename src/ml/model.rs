use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::CrossEntropyLossConfig,
        BiLstm, BiLstmConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::{activation::relu, Distribution},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SentimentClassifierConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub hidden_size:   usize,
    pub dropout:       f64,
}

impl SentimentClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentClassifier<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        let bi_lstm   = BiLstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device);
        // The bidirectional layer concatenates both directions
        let lstm      = LstmConfig::new(2 * self.hidden_size, self.hidden_size, true).init(device);
        let attribution_conv = Conv1dConfig::new(self.hidden_size, NUM_CLASSES, 1).init(device);
        let dropout   = DropoutConfig::new(self.dropout).init();
        SentimentClassifier {
            embedding, bi_lstm, lstm, attribution_conv, dropout,
            spatial_dropout: self.dropout,
        }
    }
}

pub const NUM_CLASSES: usize = 2;

#[derive(Module, Debug)]
pub struct SentimentClassifier<B: Backend> {
    pub embedding:        Embedding<B>,
    pub bi_lstm:          BiLstm<B>,
    pub lstm:             Lstm<B>,
    pub attribution_conv: Conv1d<B>,
    pub dropout:          Dropout,
    pub spatial_dropout:  f64,
}

impl<B: Backend> SentimentClassifier<B> {
    /// token_ids: [batch, seq_len] → [batch, seq_len, 2]
    ///
    /// Per-position class activations right before global average
    /// pooling. Channel 1 minus channel 0 is a token's contribution
    /// towards the positive class.
    pub fn forward_activations(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let x = self.embedding.forward(token_ids); // [batch, seq_len, embedding_dim]
        let x = spatial_dropout(x, self.spatial_dropout);

        let (x, _) = self.bi_lstm.forward(x, None); // [batch, seq_len, 2 * hidden]
        let x = self.dropout.forward(x);
        let (x, _) = self.lstm.forward(x, None); // [batch, seq_len, hidden]
        let x = self.dropout.forward(x);

        // Conv1d wants channels first: [batch, hidden, seq_len]
        let x = self.attribution_conv.forward(x.swap_dims(1, 2));
        relu(x).swap_dims(1, 2)
    }

    /// token_ids: [batch, seq_len] → logits: [batch, 2]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let activations = self.forward_activations(token_ids);
        let [batch_size, _, channels] = activations.dims();
        activations.mean_dim(1).reshape([batch_size, channels])
    }

    /// Class probabilities, softmax over the pooled logits
    pub fn forward_probabilities(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(token_ids), 1)
    }

    /// Weighted cross-entropy loss over a batch.
    /// `class_weights` is indexed by class; pass `None` for the
    /// unweighted loss used on the validation set.
    pub fn forward_classification(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        targets:       Tensor<B, 1, Int>,
        class_weights: Option<&[f32]>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(token_ids);
        let loss = CrossEntropyLossConfig::new()
            .with_weights(class_weights.map(<[f32]>::to_vec))
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

/// Drops whole embedding channels for every position of a sequence
/// at once. Only active when the backend tracks gradients.
fn spatial_dropout<B: Backend>(x: Tensor<B, 3>, prob: f64) -> Tensor<B, 3> {
    if !B::ad_enabled() || prob <= 0.0 {
        return x;
    }
    let [batch_size, _, channels] = x.dims();
    let keep = 1.0 - prob;
    let mask = Tensor::<B, 3>::random(
        [batch_size, 1, channels],
        Distribution::Bernoulli(keep),
        &x.device(),
    );
    x * mask.div_scalar(keep)
}
