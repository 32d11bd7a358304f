use super::{AgentError, SigningAgent};
use crate::{
    cancel::CancelToken,
    error::{InvokeError, Stage},
};
use log::{debug, warn};
use tickets_common::{
    crypto::Address,
    network::Network,
    serializer::Serializer,
    transaction::{PreparedTransaction, SignedTransaction},
};

// Hand the canonical bytes of `prepared` to the signing agent and wait for the user.
// The wait may last indefinitely: it is raced against `token` only, and a
// cancellation says nothing about the agent availability.
pub async fn sign(
    agent: &dyn SigningAgent,
    prepared: &PreparedTransaction,
    network: &Network,
    signer: &Address,
    token: &CancelToken,
) -> Result<SignedTransaction, InvokeError> {
    let bytes = prepared.to_bytes();
    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Requesting signature of {} ({} bytes) from {}",
            prepared.hash(network),
            bytes.len(),
            signer
        );
    }

    let response = token
        .run(agent.sign_transaction(&bytes, network.passphrase(), signer))
        .await
        .ok_or(InvokeError::Cancelled {
            stage: Stage::Sign,
            transaction: None,
        })?;

    let signed_bytes = response.map_err(|e| match e {
        AgentError::Declined(reason) => InvokeError::SigningRejected(reason),
        AgentError::Unavailable(reason) => {
            if log::log_enabled!(log::Level::Warn) {
                warn!("Signing agent disappeared: {}", reason);
            }
            InvokeError::AgentUnavailable(Stage::Sign)
        }
        AgentError::Protocol(reason) => InvokeError::SigningProtocol {
            stage: Stage::Sign,
            reason,
        },
    })?;

    let signed = SignedTransaction::from_bytes(&signed_bytes).map_err(|e| {
        InvokeError::SigningProtocol {
            stage: Stage::Sign,
            reason: format!("cannot decode signed transaction: {}", e),
        }
    })?;

    if signed.signatures().is_empty() {
        return Err(InvokeError::SigningProtocol {
            stage: Stage::Sign,
            reason: "signed transaction carries no signature".to_owned(),
        });
    }

    // The agent must sign exactly what it was given
    if !signed.wraps(prepared) {
        return Err(InvokeError::SigningProtocol {
            stage: Stage::Sign,
            reason: "signed transaction differs from the prepared one".to_owned(),
        });
    }

    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tickets_common::{
        contract::ScValue,
        crypto::ContractId,
        transaction::{
            ContractTransactionData, DecoratedSignature, InvokeContractOperation, TimeBounds,
            UnsignedTransaction,
        },
    };

    const SIGNER: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
    const CONTRACT: &str = "CDLZFC3SYJYDZT7K67VZ75HPJVIEUVNIXF47ZG2FB2RMQQVU2HHGCYSC";

    enum Behavior {
        Sign(usize),
        Tamper,
        Garbage,
        Fail(AgentError),
        Hang,
    }

    struct ScriptedAgent(Behavior);

    #[async_trait]
    impl SigningAgent for ScriptedAgent {
        async fn is_connected(&self) -> Result<bool, AgentError> {
            Ok(true)
        }

        async fn request_access(&self) -> Result<Address, AgentError> {
            Ok(Address::new(SIGNER).unwrap())
        }

        async fn get_address(&self) -> Result<Option<Address>, AgentError> {
            Ok(Some(Address::new(SIGNER).unwrap()))
        }

        async fn sign_transaction(
            &self,
            transaction: &[u8],
            _: &str,
            _: &Address,
        ) -> Result<Vec<u8>, AgentError> {
            let prepared = PreparedTransaction::from_bytes(transaction).unwrap();
            let signature = DecoratedSignature {
                hint: [0; 4],
                signature: vec![1; 64],
            };
            match &self.0 {
                Behavior::Sign(count) => {
                    Ok(SignedTransaction::new(&prepared, vec![signature; *count]).to_bytes())
                }
                Behavior::Tamper => {
                    let other = unsigned(7).prepare(ContractTransactionData::default(), vec![], 1);
                    Ok(SignedTransaction::new(&other, vec![signature]).to_bytes())
                }
                Behavior::Garbage => Ok(vec![1, 2, 3]),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!()
                }
            }
        }
    }

    fn unsigned(sequence: i64) -> UnsignedTransaction {
        UnsignedTransaction::new(
            Address::new(SIGNER).unwrap(),
            100,
            sequence,
            TimeBounds::with_timeout(1_735_689_600, 30),
            InvokeContractOperation::new(
                ContractId::new(CONTRACT).unwrap(),
                "verify_ticket".to_owned(),
                vec![ScValue::U32(1), ScValue::Address(Address::new(SIGNER).unwrap())],
            ),
        )
    }

    async fn run(behavior: Behavior, token: &CancelToken) -> Result<SignedTransaction, InvokeError> {
        let prepared = unsigned(1).prepare(ContractTransactionData::default(), vec![], 100);
        sign(
            &ScriptedAgent(behavior),
            &prepared,
            &Network::Testnet,
            &Address::new(SIGNER).unwrap(),
            token,
        )
        .await
    }

    #[tokio::test]
    async fn test_signed() {
        let signed = run(Behavior::Sign(1), &CancelToken::new()).await.unwrap();
        assert_eq!(signed.signatures().len(), 1);
    }

    #[tokio::test]
    async fn test_agent_failures() {
        let token = CancelToken::new();
        assert!(matches!(
            run(Behavior::Fail(AgentError::Declined("no".to_owned())), &token).await,
            Err(InvokeError::SigningRejected(_))
        ));
        assert!(matches!(
            run(Behavior::Fail(AgentError::Unavailable("gone".to_owned())), &token).await,
            Err(InvokeError::AgentUnavailable(Stage::Sign))
        ));
    }

    #[tokio::test]
    async fn test_malformed_responses() {
        let token = CancelToken::new();
        for behavior in [Behavior::Sign(0), Behavior::Tamper, Behavior::Garbage] {
            assert!(matches!(
                run(behavior, &token).await,
                Err(InvokeError::SigningProtocol {
                    stage: Stage::Sign,
                    ..
                })
            ));
        }
    }

    #[tokio::test]
    async fn test_cancelled_wait() {
        let token = CancelToken::new();
        let handle = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        assert!(matches!(
            run(Behavior::Hang, &token).await,
            Err(InvokeError::Cancelled {
                stage: Stage::Sign,
                transaction: None
            })
        ));
    }
}
