#[cfg(test)]
mod tests {
    use crate::errors::{DatabaseError, Error};
    use crate::transactions::*;
    use crate::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock TransactionRepository ---
    #[derive(Default)]
    struct MockTransactionRepository {
        transactions: Mutex<Vec<Transaction>>,
    }

    impl MockTransactionRepository {
        fn not_found(id: i64) -> Error {
            Error::Database(DatabaseError::NotFound(format!("transaction {}", id)))
        }
    }

    #[async_trait]
    impl TransactionRepositoryTrait for MockTransactionRepository {
        fn list_transactions(&self, order: SortDirection) -> Result<Vec<Transaction>> {
            let mut all = self.transactions.lock().unwrap().clone();
            all.sort_by_key(|t| (t.purchased_at, t.id));
            if order == SortDirection::Desc {
                all.reverse();
            }
            Ok(all)
        }

        fn get_transaction(&self, transaction_id: i64) -> Result<Transaction> {
            self.transactions
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == transaction_id)
                .cloned()
                .ok_or_else(|| Self::not_found(transaction_id))
        }

        async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
            let mut all = self.transactions.lock().unwrap();
            let tx = Transaction {
                id: all.len() as i64 + 1,
                symbol: new_transaction.symbol,
                amount: new_transaction.amount,
                price_at_purchase: new_transaction.price_at_purchase,
                purchased_at: new_transaction.purchased_at,
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            };
            all.push(tx.clone());
            Ok(tx)
        }

        async fn update_transaction(
            &self,
            transaction_id: i64,
            replacement: NewTransaction,
        ) -> Result<Transaction> {
            let mut all = self.transactions.lock().unwrap();
            let existing = all
                .iter_mut()
                .find(|t| t.id == transaction_id)
                .ok_or_else(|| Self::not_found(transaction_id))?;
            existing.symbol = replacement.symbol;
            existing.amount = replacement.amount;
            existing.price_at_purchase = replacement.price_at_purchase;
            existing.purchased_at = replacement.purchased_at;
            Ok(existing.clone())
        }

        async fn delete_transaction(&self, transaction_id: i64) -> Result<Transaction> {
            let mut all = self.transactions.lock().unwrap();
            let position = all
                .iter()
                .position(|t| t.id == transaction_id)
                .ok_or_else(|| Self::not_found(transaction_id))?;
            Ok(all.remove(position))
        }
    }

    fn service() -> TransactionService {
        TransactionService::new(
            Arc::new(MockTransactionRepository::default()),
            chrono_tz::UTC,
        )
    }

    fn input(symbol: &str, purchased_at: &str) -> TransactionInput {
        TransactionInput {
            symbol: symbol.to_string(),
            amount: dec!(1),
            price_at_purchase: dec!(100),
            purchased_at: purchased_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let service = service();
        service.create_transaction(input("BTC", "2024-01-01")).await.unwrap();
        service.create_transaction(input("ETH", "2024-03-01")).await.unwrap();
        service.create_transaction(input("BTC", "2024-02-01")).await.unwrap();

        let listed = service.list_transactions().unwrap();
        let ids: Vec<i64> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_zero_price_purchase_is_stored() {
        let service = service();
        let created = service
            .create_transaction(TransactionInput {
                symbol: "ETH".to_string(),
                amount: dec!(0.1),
                price_at_purchase: dec!(0),
                purchased_at: "2023-10-27T10:00:00Z".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.price_at_purchase, dec!(0));
        assert_eq!(created.amount, dec!(0.1));
        assert_eq!(service.get_transaction(created.id).unwrap(), created);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_created_at() {
        let service = service();
        let created = service.create_transaction(input("BTC", "2024-01-01")).await.unwrap();

        let updated = service
            .update_transaction(
                created.id,
                TransactionInput {
                    symbol: "eth".to_string(),
                    amount: dec!(3),
                    price_at_purchase: dec!(5),
                    purchased_at: "2024-02-02".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.symbol, "ETH");
        assert_eq!(updated.amount, dec!(3));
        assert_eq!(updated.price_at_purchase, dec!(5));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_missing_id_is_transaction_not_found() {
        let service = service();

        let get_err = service.get_transaction(42).unwrap_err();
        assert!(matches!(
            get_err,
            Error::Transaction(TransactionError::NotFound(42))
        ));

        let update_err = service
            .update_transaction(42, input("BTC", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(update_err.is_not_found());

        let delete_err = service.delete_transaction(42).await.unwrap_err();
        assert!(matches!(
            delete_err,
            Error::Transaction(TransactionError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_lookup() {
        let service = service();
        let err = service
            .update_transaction(42, input("BTC", "not-a-date"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_transaction() {
        let service = service();
        let created = service.create_transaction(input("BTC", "2024-01-01")).await.unwrap();

        let deleted = service.delete_transaction(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(service.list_transactions().unwrap().is_empty());
    }
}
