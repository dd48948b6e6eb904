use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ForwarderError {
    InvalidConfig = 1,
    InvalidAmount = 2,
    EmptyOrderSet = 3,
    AssetMismatch = 4,
    FeePercentageTooHigh = 5,
    /// Orders ran out before the target was met
    UnreachableTarget = 6,
    TransferFailed = 7,
    WrapFailed = 8,
    Reentrant = 9,
    /// A settlement left value behind in the contract
    ResidualBalance = 10,
    /// The exchange reported a fill that disagrees with what moved
    InvalidFillResult = 11,
    ArithmeticOverflow = 12,
    Overspent = 13,
}
