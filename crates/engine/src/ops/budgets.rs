use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Budget, EngineError, ResultEngine, budgets, categories};

use super::{Engine, require_positive_amount, with_tx};

impl Engine {
    /// Creates or replaces the budget for a category.
    ///
    /// Budgets are keyed by the canonical category, so `Food` and `food`
    /// share one line. The limit is stamped with the user's display
    /// currency.
    pub async fn upsert_budget(
        &self,
        username: &str,
        category: &str,
        monthly_limit_minor: i64,
    ) -> ResultEngine<Budget> {
        require_positive_amount(monthly_limit_minor)?;
        let category = categories::normalize_display(category)?;
        let category_norm = categories::canonical_key(&category);
        let currency = self.user_settings(username).await?.currency;

        let model: budgets::Model = with_tx!(self, |tx| {
            let existing = budgets::Entity::find()
                .filter(budgets::Column::Username.eq(username))
                .filter(budgets::Column::CategoryNorm.eq(category_norm.as_str()))
                .one(&tx)
                .await?;

            match existing {
                Some(existing) => {
                    let mut active: budgets::ActiveModel = existing.into();
                    active.category = ActiveValue::Set(category.clone());
                    active.monthly_limit_minor = ActiveValue::Set(monthly_limit_minor);
                    active.update(&tx).await.map_err(EngineError::from)
                }
                None => {
                    let active: budgets::ActiveModel = budgets::Model {
                        id: Uuid::new_v4(),
                        username: username.to_string(),
                        category: category.clone(),
                        category_norm: category_norm.clone(),
                        monthly_limit_minor,
                        currency: currency.code().to_string(),
                    }
                    .into();
                    budgets::Entity::insert(active)
                        .exec_with_returning(&tx)
                        .await
                        .map_err(EngineError::from)
                }
            }
        })?;

        Budget::try_from(model)
    }

    /// Lists the user's budget lines, alphabetically.
    pub async fn budgets(&self, username: &str) -> ResultEngine<Vec<Budget>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::Username.eq(username))
            .order_by_asc(budgets::Column::CategoryNorm)
            .all(self.db())
            .await?;

        models
            .into_iter()
            .map(Budget::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    /// Deletes one budget line. Missing ids report `KeyNotFound`.
    pub async fn delete_budget(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget".to_string()));
        }
        Ok(())
    }
}
