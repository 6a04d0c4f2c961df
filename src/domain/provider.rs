//! Response provider trait definition

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// The real compute path behind the cache (an assistant backend, a planner, ...)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResponseProvider<R: Send + Sync + 'static>: Send + Sync {
    /// Produce a fresh response for the query
    async fn generate(&self, query: &str) -> Result<R, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_response_provider() {
        let mut mock = MockResponseProvider::<String>::new();

        mock.expect_generate()
            .returning(|query| Ok(format!("echo: {}", query)));
        mock.expect_provider_name().return_const("mock");

        let result = mock.generate("hello there").await.unwrap();
        assert_eq!(result, "echo: hello there");
        assert_eq!(mock.provider_name(), "mock");
    }

    #[test]
    fn test_mock_provider_error_outside_async_context() {
        let mut mock = MockResponseProvider::<String>::new();

        mock.expect_generate()
            .returning(|_| Err(DomainError::provider("mock", "rate limited")));

        let result = tokio_test::block_on(mock.generate("hello there"));

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_mock_provider_shared_across_tasks() {
        let mut mock = MockResponseProvider::<String>::new();
        mock.expect_generate()
            .returning(|query| Ok(query.to_uppercase()));

        let provider: Arc<dyn ResponseProvider<String>> = Arc::new(mock);
        let task = tokio::spawn({
            let provider = provider.clone();
            async move { provider.generate("shared provider").await }
        });

        assert_eq!(task.await.unwrap().unwrap(), "SHARED PROVIDER");
    }
}
