//! Transaction size estimation used for fee quotes

/// Estimates the serialized size in bytes of a transaction with the given
/// number of inputs and outputs.
pub trait SizeEstimator: Send + Sync {
    fn estimate_size(&self, inputs: usize, outputs: usize) -> u64;
}

impl<F> SizeEstimator for F
where
    F: Fn(usize, usize) -> u64 + Send + Sync,
{
    fn estimate_size(&self, inputs: usize, outputs: usize) -> u64 {
        self(inputs, outputs)
    }
}

/// `base + inputs * per_input + outputs * per_output`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearSizeEstimator {
    pub base: u64,
    pub per_input: u64,
    pub per_output: u64,
}

impl LinearSizeEstimator {
    /// Sizes for spending 2-of-2 multisig P2SH inputs: two signatures plus
    /// the redeem script in every script_sig.
    pub fn multisig_2of2() -> Self {
        Self {
            base: 10,
            per_input: 297,
            per_output: 34,
        }
    }

    /// Sizes for single-key P2WPKH inputs, in virtual bytes.
    pub fn p2wpkh() -> Self {
        Self {
            base: 10,
            per_input: 68,
            per_output: 34,
        }
    }
}

impl Default for LinearSizeEstimator {
    fn default() -> Self {
        Self::multisig_2of2()
    }
}

impl SizeEstimator for LinearSizeEstimator {
    fn estimate_size(&self, inputs: usize, outputs: usize) -> u64 {
        self.base + (inputs as u64 * self.per_input) + (outputs as u64 * self.per_output)
    }
}
