//! Interactive popup flow choreography.
//!
//! Popup flows bypass the embedded-frame bootstrap queue entirely: login
//! works before the frame is ready, the vault context probes the host for
//! liveness, and `flow-completed` resolves exactly one waiting caller.

#[cfg(test)]
mod tests {
    use crate::integration::support::{test_config, TestVault};
    use serde_json::json;
    use vault_client::{ClientError, LoginOptions, SessionState};
    use vault_types::VaultMethod;

    #[tokio::test]
    async fn login_before_frame_readiness() {
        let vault = TestVault::spawn(test_config());
        assert!(!vault.client.is_ready());

        let login = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.login(LoginOptions::new(2)).await })
        };

        while vault.surface.opened().is_empty() {
            tokio::task::yield_now().await;
        }
        let (_, url, spec) = vault.surface.opened().remove(0);
        assert_eq!(url.path(), "/log-in");
        assert!(url.query().unwrap().contains("access-level=2"));
        // Centered over the harness's 1920x1080 caller window.
        assert_eq!((spec.left, spec.top), (560, 40));

        vault
            .send_request(
                "flow-completed",
                json!({
                    "publicKeyAdded": "X",
                    "users": { "X": { "accessLevel": 2, "balanceNanos": 17 } }
                }),
            )
            .await;

        let receipt = login.await.unwrap().unwrap();
        assert_eq!(receipt.public_key, "X");
        assert_eq!(receipt.user["balanceNanos"], 17);

        // Popup closed, slot cleared.
        assert_eq!(vault.surface.closed().len(), 1);
        assert_eq!(vault.client.session_state(), SessionState::Idle);

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn info_probe_acknowledged_to_active_popup() {
        let vault = TestVault::spawn(test_config());

        let _login = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.login(LoginOptions::new(2)).await })
        };
        while vault.surface.opened().is_empty() {
            tokio::task::yield_now().await;
        }
        let popup = vault.surface.opened().remove(0).0;

        let probe_id = vault.send_request("info-probe", json!({})).await;
        while vault.surface.posted().is_empty() {
            tokio::task::yield_now().await;
        }

        let (handle, ack) = vault.surface.posted().remove(0);
        assert_eq!(handle, popup);
        assert_eq!(ack.id, probe_id);
        assert!(ack.method.is_none());
        assert_eq!(ack.payload, json!({}));

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn embedded_request_survives_concurrent_flow() {
        let mut vault = TestVault::spawn(test_config());
        vault.bootstrap().await;

        let sign = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.request(VaultMethod::Sign, json!({}), None).await })
        };
        let request = vault.outbound.recv().await.unwrap();

        let login = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.login(LoginOptions::new(3)).await })
        };
        while vault.surface.opened().is_empty() {
            tokio::task::yield_now().await;
        }

        // Flow completes first, then the embedded response arrives.
        vault
            .send_request(
                "flow-completed",
                json!({"publicKeyAdded": "Y", "users": {"Y": {}}}),
            )
            .await;
        vault.respond(request.id, json!("signed")).await;

        assert_eq!(login.await.unwrap().unwrap().public_key, "Y");
        assert_eq!(sign.await.unwrap().unwrap(), json!("signed"));

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn stale_flow_completion_is_dropped() {
        let vault = TestVault::spawn(test_config());

        // No session active: dropped, and the client stays healthy.
        vault
            .send_request("flow-completed", json!({"publicKeyAdded": "Z"}))
            .await;

        let login = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.login(LoginOptions::new(2)).await })
        };
        while vault.surface.opened().is_empty() {
            tokio::task::yield_now().await;
        }
        vault
            .send_request(
                "flow-completed",
                json!({"publicKeyAdded": "X", "users": {"X": {}}}),
            )
            .await;

        assert_eq!(login.await.unwrap().unwrap().public_key, "X");
        vault.shutdown().await;
    }

    #[tokio::test]
    async fn second_flow_fails_fast_while_active() {
        let vault = TestVault::spawn(test_config());

        let _login = {
            let client = vault.client.clone();
            tokio::spawn(async move { client.login(LoginOptions::new(2)).await })
        };
        while vault.surface.opened().is_empty() {
            tokio::task::yield_now().await;
        }

        let err = vault.client.get_free_funds("pk").await.unwrap_err();
        assert!(matches!(err, ClientError::SessionActive));
        // Only the first popup was ever opened.
        assert_eq!(vault.surface.opened().len(), 1);

        vault.shutdown().await;
    }

    #[tokio::test]
    async fn required_parameters_checked_before_launch() {
        let vault = TestVault::spawn(test_config());

        for err in [
            vault.client.logout("").await.unwrap_err(),
            vault.client.approve_transaction("").await.unwrap_err(),
            vault.client.verify_phone("").await.unwrap_err(),
            vault.client.get_free_funds("").await.unwrap_err(),
        ] {
            assert!(matches!(err, ClientError::MissingParameter(_)));
        }
        assert!(vault.surface.opened().is_empty());
        assert_eq!(vault.client.session_state(), SessionState::Idle);

        vault.shutdown().await;
    }
}
