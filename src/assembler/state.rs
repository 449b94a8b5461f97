/// Phases of a descriptor-assembly session, in the order they are entered.
///
/// `Inferring` and `ConfiguringTestcases` are optional: a session without
/// service descriptors goes from `Init` straight to `ReadingIntent`, and one
/// where the user declines configuration goes from `ResetSections` to
/// `Serialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Inferring,
    ReadingIntent,
    CollectingMetadata,
    ResetSections,
    ConfiguringTestcases,
    Serialize,
    Done,
}
