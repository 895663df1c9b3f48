/// An entity ordered by a 1-based priority within its scope.
///
/// Within one scope (for example all feature rules of one application type)
/// the priorities are expected to be dense: exactly `1..=n` for `n` items.
pub trait Prioritizable {
    fn id(&self) -> &str;
    fn priority(&self) -> i32;
    fn set_priority(&mut self, priority: i32);
}
