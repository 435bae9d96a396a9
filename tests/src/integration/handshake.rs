//! Bootstrap handshake, correlation, and dispatch-ordering choreography.
//!
//! Exercises the protocol core end to end: requests issued before the
//! embedded frame is ready are buffered and flushed FIFO on the readiness
//! signal; responses are matched to outstanding requests purely by
//! correlation id; protocol errors never kill the dispatcher.

#[cfg(test)]
mod tests {
    use crate::integration::support::{test_config, TestVault};
    use serde_json::json;
    use std::time::Duration;
    use vault_client::ClientError;
    use vault_types::{AccessCredentials, SignRequest, VaultMethod};

    fn credentials() -> AccessCredentials {
        AccessCredentials {
            access_level: 2,
            access_level_hmac: "hmac".to_string(),
            encrypted_seed_hex: "seed".to_string(),
        }
    }

    #[tokio::test]
    async fn bootstrap_flushes_buffered_requests_in_issue_order() {
        let mut vault = TestVault::spawn(test_config());

        // Three operations issued while the frame is not ready.
        let tasks: Vec<_> = ["0x01", "0x02", "0x03"]
            .into_iter()
            .map(|tx| {
                let client = vault.client.clone();
                let request = SignRequest {
                    credentials: credentials(),
                    transaction_hex: tx.to_string(),
                };
                tokio::spawn(async move { client.sign(request).await })
            })
            .collect();

        while vault.client.pending_count() < 3 {
            tokio::task::yield_now().await;
        }
        assert!(!vault.client.is_ready());
        assert!(vault.outbound.try_recv().is_err());

        let bootstrap_id = vault.send_request("bootstrap-ready", json!({})).await;

        // Delivery order equals issuance order, then the handshake ack.
        let mut flushed = Vec::new();
        for _ in 0..3 {
            flushed.push(vault.outbound.recv().await.unwrap());
        }
        assert_eq!(
            flushed
                .iter()
                .map(|e| e.payload["transactionHex"].as_str().unwrap())
                .collect::<Vec<_>>(),
            vec!["0x01", "0x02", "0x03"]
        );

        let ack = vault.outbound.recv().await.unwrap();
        assert_eq!(ack.id, bootstrap_id);
        assert!(ack.method.is_none());
        assert_eq!(ack.payload, json!({}));
        assert!(vault.client.is_ready());

        // Answer in order; every caller resolves.
        for envelope in &flushed {
            vault
                .respond(envelope.id, json!({"signed": envelope.payload["transactionHex"]}))
                .await;
        }
        for (task, tx) in tasks.into_iter().zip(["0x01", "0x02", "0x03"]) {
            assert_eq!(task.await.unwrap().unwrap()["signed"], tx);
        }

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn out_of_order_responses_resolve_independently() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let task_a = {
            let client = vault.client.clone();
            tokio::spawn(async move {
                client
                    .request(VaultMethod::Sign, json!({"which": "a"}), None)
                    .await
            })
        };
        let req_a = vault.outbound.recv().await.unwrap();

        let task_b = {
            let client = vault.client.clone();
            tokio::spawn(async move {
                client
                    .request(VaultMethod::Encrypt, json!({"which": "b"}), None)
                    .await
            })
        };
        let req_b = vault.outbound.recv().await.unwrap();

        // B answered before A.
        vault.respond(req_b.id, json!("b")).await;
        let result_b = task_b.await.unwrap().unwrap();
        assert_eq!(result_b, json!("b"));
        assert_eq!(vault.client.pending_count(), 1);

        vault.respond(req_a.id, json!("a")).await;
        assert_eq!(task_a.await.unwrap().unwrap(), json!("a"));
        assert_eq!(vault.client.pending_count(), 0);

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn duplicate_response_is_a_noop() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let task = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.request(VaultMethod::Sign, json!({}), None).await })
        };
        let request = vault.outbound.recv().await.unwrap();

        vault.respond(request.id, json!("first")).await;
        vault.respond(request.id, json!("second")).await;

        assert_eq!(task.await.unwrap().unwrap(), json!("first"));
        assert_eq!(vault.client.pending_count(), 0);

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn foreign_service_tag_never_reaches_a_handler() {
        let mut vault = TestVault::spawn(test_config());

        let envelope = vault_types::Envelope {
            id: vault_types::CorrelationId::new(),
            service: "analytics".to_string(),
            method: Some("bootstrap-ready".to_string()),
            payload: json!({}),
        };
        vault.inbound.send(envelope).await.unwrap();

        // Prove the pump processed it by pushing a real bootstrap after.
        vault.bootstrap().await;
        assert!(vault.client.is_ready());
        // The foreign message produced no ack of its own.
        assert!(vault.outbound.try_recv().is_err());

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_method_is_logged_and_dropped() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let task = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.request(VaultMethod::Sign, json!({}), None).await })
        };
        let request = vault.outbound.recv().await.unwrap();

        vault.send_request("unknown-op", json!({"junk": true})).await;

        // Dispatcher survives; the pending promise is untouched and still
        // resolvable.
        assert_eq!(vault.client.pending_count(), 1);
        vault.respond(request.id, json!("ok")).await;
        assert_eq!(task.await.unwrap().unwrap(), json!("ok"));

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn replayed_bootstrap_does_not_reflush() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let replay_id = vault.send_request("bootstrap-ready", json!({})).await;
        let ack = vault.outbound.recv().await.unwrap();
        assert_eq!(ack.id, replay_id);

        // Ack only: nothing was re-flushed.
        assert!(vault.outbound.try_recv().is_err());
        assert!(vault.client.is_ready());

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn request_timeout_fails_caller_and_clears_entry() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let err = vault
            .client
            .request(
                VaultMethod::IssueToken,
                json!({}),
                Some(Duration::from_millis(20)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout { .. }));
        assert_eq!(vault.client.pending_count(), 0);

        vault.shutdown().await;
    }
}
