use super::children::{children_of, reassign_children};
use super::require;
use crate::model::{Data, Output, Transaction};
use async_trait::async_trait;
use resource_framework::{FrameworkError, Repository, ResourceClient};
use std::collections::BTreeSet;
use tracing::instrument;

/// Repository for transactions and the `Data` / `Output` rows they own.
#[derive(Clone)]
pub struct TransactionRepository {
    transactions: ResourceClient<Transaction>,
    datas: ResourceClient<Data>,
    outputs: ResourceClient<Output>,
}

impl TransactionRepository {
    pub fn new(
        transactions: ResourceClient<Transaction>,
        datas: ResourceClient<Data>,
        outputs: ResourceClient<Output>,
    ) -> Self {
        Self {
            transactions,
            datas,
            outputs,
        }
    }

    #[instrument(skip(self, data_ids))]
    pub async fn set_datas(&self, transaction_id: i64, data_ids: BTreeSet<i64>) -> Result<usize, FrameworkError> {
        require(&self.transactions, transaction_id).await?;
        reassign_children(&self.datas, transaction_id, data_ids).await
    }

    #[instrument(skip(self, output_ids))]
    pub async fn set_outputs(
        &self,
        transaction_id: i64,
        output_ids: BTreeSet<i64>,
    ) -> Result<usize, FrameworkError> {
        require(&self.transactions, transaction_id).await?;
        reassign_children(&self.outputs, transaction_id, output_ids).await
    }
}

#[async_trait]
impl Repository<Transaction> for TransactionRepository {
    fn table(&self) -> &ResourceClient<Transaction> {
        &self.transactions
    }

    async fn hydrate(&self, transaction: &mut Transaction, eager: bool) -> Result<(), FrameworkError> {
        if let (true, Some(id)) = (eager, transaction.id) {
            transaction.datas = children_of(&self.datas, id).await?;
            let mut outputs = children_of(&self.outputs, id).await?;
            outputs.sort_by_key(|output| output.position);
            transaction.outputs = outputs;
        }
        Ok(())
    }
}
