use super::ScValue;
use crate::{
    codec::{validate_function_name, EncodingError},
    config::MAX_ARGUMENTS_PER_CALL,
    crypto::Address,
};
use serde::{Deserialize, Serialize};

/// A single contract function call on behalf of `caller`.
/// Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    function: String,
    arguments: Vec<ScValue>,
    caller: Address,
}

impl InvocationRequest {
    pub fn new<S: Into<String>>(
        function: S,
        arguments: Vec<ScValue>,
        caller: Address,
    ) -> Result<Self, EncodingError> {
        let function = function.into();
        validate_function_name(&function)?;
        if arguments.len() > MAX_ARGUMENTS_PER_CALL {
            return Err(EncodingError::TooManyArguments(arguments.len()));
        }

        Ok(Self {
            function,
            arguments,
            caller,
        })
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arguments(&self) -> &[ScValue] {
        &self.arguments
    }

    pub fn caller(&self) -> &Address {
        &self.caller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> Address {
        Address::new("GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7").unwrap()
    }

    #[test]
    fn test_rejects_bad_function_name() {
        assert!(matches!(
            InvocationRequest::new("create-event", vec![], caller()),
            Err(EncodingError::InvalidFunctionName(_))
        ));
    }

    #[test]
    fn test_rejects_too_many_arguments() {
        let arguments = vec![ScValue::Void; MAX_ARGUMENTS_PER_CALL + 1];
        assert_eq!(
            InvocationRequest::new("initialize", arguments, caller()),
            Err(EncodingError::TooManyArguments(MAX_ARGUMENTS_PER_CALL + 1))
        );
    }
}
