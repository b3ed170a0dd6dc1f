pub(crate) mod negotiation;
pub(crate) mod swaps;
pub(crate) mod valuation;
