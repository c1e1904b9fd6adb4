use crate::domain::entities::Effect;

/// Destination for fire-and-forget side effects.
///
/// `submit` must return immediately. Callers never learn whether the effect
/// ran, succeeded or failed.
pub trait EffectSink: Send + Sync {
    fn submit(&self, effect: Effect);
}
