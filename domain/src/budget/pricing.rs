//! Model pricing table.
//!
//! Prices are USD per one million tokens. A model is matched by substring of
//! its name (most specific entry first); unknown models use
//! [`DEFAULT_PRICING`].

/// Pricing information for a model family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub provider: &'static str,
    pub input_per_million: f64,
    pub output_per_million: f64,
    pub cached_per_million: f64,
}

impl ModelPricing {
    const fn new(provider: &'static str, input: f64, output: f64, cached: f64) -> Self {
        Self {
            provider,
            input_per_million: input,
            output_per_million: output,
            cached_per_million: cached,
        }
    }

    /// Cost in USD. Cached tokens are billed at the cached rate instead of the
    /// input rate, so they must not be double counted in `input_tokens`.
    pub fn calculate_cost(&self, input_tokens: u64, output_tokens: u64, cached_tokens: u64) -> f64 {
        (input_tokens as f64 * self.input_per_million
            + output_tokens as f64 * self.output_per_million
            + cached_tokens as f64 * self.cached_per_million)
            / 1_000_000.0
    }
}

// Anthropic
const CLAUDE_OPUS: ModelPricing = ModelPricing::new("anthropic", 15.0, 75.0, 1.5);
const CLAUDE_SONNET: ModelPricing = ModelPricing::new("anthropic", 3.0, 15.0, 0.3);
const CLAUDE_HAIKU: ModelPricing = ModelPricing::new("anthropic", 0.8, 4.0, 0.08);

// OpenAI
const GPT_4O_MINI: ModelPricing = ModelPricing::new("openai", 0.15, 0.6, 0.075);
const GPT_4O: ModelPricing = ModelPricing::new("openai", 2.5, 10.0, 1.25);
const GPT_5_MINI: ModelPricing = ModelPricing::new("openai", 0.25, 2.0, 0.025);
const GPT_5: ModelPricing = ModelPricing::new("openai", 1.25, 10.0, 0.125);

// Google
const GEMINI_FLASH: ModelPricing = ModelPricing::new("google", 0.3, 2.5, 0.075);
const GEMINI_PRO: ModelPricing = ModelPricing::new("google", 1.25, 10.0, 0.31);

/// Used when no table entry matches.
pub const DEFAULT_PRICING: ModelPricing = ModelPricing::new("unknown", 3.0, 15.0, 0.3);

// Ordered so that more specific names match before their prefixes
// ("gpt-4o-mini" before "gpt-4o", "gpt-5-mini" before "gpt-5").
const PRICING_TABLE: &[(&str, ModelPricing)] = &[
    ("opus", CLAUDE_OPUS),
    ("sonnet", CLAUDE_SONNET),
    ("haiku", CLAUDE_HAIKU),
    ("gpt-4o-mini", GPT_4O_MINI),
    ("gpt-4o", GPT_4O),
    ("gpt-5-mini", GPT_5_MINI),
    ("gpt-5", GPT_5),
    ("gemini-2.5-flash", GEMINI_FLASH),
    ("flash", GEMINI_FLASH),
    ("gemini", GEMINI_PRO),
];

/// Look up pricing by case-insensitive substring match on the model name.
pub fn pricing_for(model: &str) -> ModelPricing {
    let model = model.to_lowercase();
    PRICING_TABLE
        .iter()
        .find(|(needle, _)| model.contains(needle))
        .map(|(_, pricing)| *pricing)
        .unwrap_or(DEFAULT_PRICING)
}
