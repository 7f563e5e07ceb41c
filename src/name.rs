/// Types that expose a lookup name.
pub trait HasName {
    fn get_name(&self) -> &str;
}

/// Name lookup over slices of `T: HasName`.
pub trait FindByName<T> {
    /// First item whose name equals `name`.
    fn find_by_name(&self, name: &str) -> Option<&T>;
}

impl<T: HasName> FindByName<T> for [T] {
    fn find_by_name(&self, name: &str) -> Option<&T> {
        self.iter().find(|item| item.get_name() == name)
    }
}
