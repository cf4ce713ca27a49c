use crate::data::QueryError;

/// State of a screen showing a fetched collection.
///
/// There is no retry: a failed list only recovers when the screen loads again.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListState<T> {
    #[default]
    Loading,
    Error(String),
    Loaded(Vec<T>),
}

impl<T> ListState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            ListState::Loaded(items) => Some(items),
            _ => None,
        }
    }
}

impl<T> From<Result<Vec<T>, QueryError>> for ListState<T> {
    fn from(result: Result<Vec<T>, QueryError>) -> Self {
        match result {
            Ok(items) => ListState::Loaded(items),
            Err(err) => ListState::Error(err.message),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_result() {
        let loaded: ListState<u32> = Ok(vec![1, 2]).into();
        let failed: ListState<u32> = Err(QueryError::new("Failed to load customers")).into();

        assert_eq!(loaded.items(), Some([1, 2].as_slice()));
        assert_eq!(failed, ListState::Error("Failed to load customers".into()));
        assert!(ListState::<u32>::default().is_loading());
    }
}
