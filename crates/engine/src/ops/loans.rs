use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Loan, LoanPayment, LoanStatus, ResultEngine, analytics, loan_payments, loans,
};

use super::{Engine, normalize_required_name, require_positive_amount, with_tx};

#[derive(Clone, Debug)]
pub struct NewLoan {
    pub name: String,
    pub principal_minor: i64,
    pub interest_rate_pct: f64,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    /// If absent, derived from principal/rate/tenure.
    pub monthly_emi_minor: Option<i64>,
}

/// A loan together with its repayment progress.
#[derive(Clone, Debug, PartialEq)]
pub struct LoanProgress {
    pub loan: Loan,
    /// Sum of recorded payments.
    pub paid_minor: i64,
    /// Amortized principal still owed after the recorded installments.
    pub outstanding_minor: i64,
}

impl Engine {
    pub async fn create_loan(&self, username: &str, new: NewLoan) -> ResultEngine<Loan> {
        let name = normalize_required_name(&new.name, "loan name")?;
        require_positive_amount(new.principal_minor)?;
        if new.tenure_months == 0 {
            return Err(EngineError::InvalidInput(
                "tenure must be at least one month".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&new.interest_rate_pct) {
            return Err(EngineError::InvalidInput(
                "interest rate must be between 0 and 100 percent".to_string(),
            ));
        }

        let monthly_emi_minor = match new.monthly_emi_minor {
            Some(emi) => require_positive_amount(emi)?,
            None => analytics::monthly_emi(
                new.principal_minor,
                new.interest_rate_pct,
                new.tenure_months,
            ),
        };

        let model = loans::Model {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name,
            principal_minor: new.principal_minor,
            interest_rate_pct: new.interest_rate_pct,
            tenure_months: new.tenure_months as i32,
            monthly_emi_minor,
            start_date: new.start_date,
            status: LoanStatus::Active.as_str().to_string(),
        };

        let active: loans::ActiveModel = model.into();
        let inserted = loans::Entity::insert(active)
            .exec_with_returning(self.db())
            .await?;
        Loan::try_from(inserted)
    }

    /// Lists loans newest first, each with its repayment progress.
    pub async fn loans(&self, username: &str) -> ResultEngine<Vec<LoanProgress>> {
        let models = loans::Entity::find()
            .filter(loans::Column::Username.eq(username))
            .order_by_desc(loans::Column::StartDate)
            .find_with_related(loan_payments::Entity)
            .all(self.db())
            .await?;

        models
            .into_iter()
            .map(|(model, payments)| {
                let loan = Loan::try_from(model)?;
                let paid_minor: i64 = payments.iter().map(|p| p.amount_minor).sum();
                let installments = if loan.monthly_emi_minor > 0 {
                    (paid_minor / loan.monthly_emi_minor).max(0) as u32
                } else {
                    0
                };
                let outstanding_minor = analytics::outstanding_principal(
                    loan.principal_minor,
                    loan.interest_rate_pct,
                    loan.monthly_emi_minor,
                    installments.min(loan.tenure_months),
                );
                Ok(LoanProgress {
                    loan,
                    paid_minor,
                    outstanding_minor,
                })
            })
            .collect::<ResultEngine<Vec<_>>>()
    }

    pub async fn update_loan(
        &self,
        username: &str,
        id: Uuid,
        name: Option<String>,
        status: Option<LoanStatus>,
    ) -> ResultEngine<Loan> {
        let name = match &name {
            Some(name) => Some(normalize_required_name(name, "loan name")?),
            None => None,
        };

        let updated: loans::Model = with_tx!(self, |tx| {
            let model = loans::Entity::find_by_id(id)
                .filter(loans::Column::Username.eq(username))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("loan".to_string()))?;

            let mut active: loans::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(status) = status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            active.update(&tx).await.map_err(EngineError::from)
        })?;

        Loan::try_from(updated)
    }

    /// Deletes a loan and, via the FK cascade, its recorded payments.
    pub async fn delete_loan(&self, username: &str, id: Uuid) -> ResultEngine<()> {
        let result = loans::Entity::delete_many()
            .filter(loans::Column::Id.eq(id))
            .filter(loans::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("loan".to_string()));
        }
        Ok(())
    }

    /// Records a repayment against one of the user's loans.
    pub async fn record_loan_payment(
        &self,
        username: &str,
        loan_id: Uuid,
        amount_minor: i64,
        paid_at: DateTime<Utc>,
        note: Option<String>,
    ) -> ResultEngine<LoanPayment> {
        require_positive_amount(amount_minor)?;

        let inserted: loan_payments::Model = with_tx!(self, |tx| {
            loans::Entity::find_by_id(loan_id)
                .filter(loans::Column::Username.eq(username))
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("loan".to_string()))?;

            let active: loan_payments::ActiveModel = loan_payments::Model {
                id: Uuid::new_v4(),
                loan_id,
                username: username.to_string(),
                amount_minor,
                paid_at,
                note,
            }
            .into();
            loan_payments::Entity::insert(active)
                .exec_with_returning(&tx)
                .await
                .map_err(EngineError::from)
        })?;

        Ok(LoanPayment::from(inserted))
    }

    /// Removes a recorded payment.
    pub async fn delete_loan_payment(
        &self,
        username: &str,
        loan_id: Uuid,
        payment_id: Uuid,
    ) -> ResultEngine<()> {
        let result = loan_payments::Entity::delete_many()
            .filter(loan_payments::Column::Id.eq(payment_id))
            .filter(loan_payments::Column::LoanId.eq(loan_id))
            .filter(loan_payments::Column::Username.eq(username))
            .exec(self.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("loan payment".to_string()));
        }
        Ok(())
    }

    /// Lists recorded payments for one loan, newest first.
    pub async fn loan_payments(
        &self,
        username: &str,
        loan_id: Uuid,
    ) -> ResultEngine<Vec<LoanPayment>> {
        loans::Entity::find_by_id(loan_id)
            .filter(loans::Column::Username.eq(username))
            .one(self.db())
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("loan".to_string()))?;

        let models = loan_payments::Entity::find()
            .filter(loan_payments::Column::LoanId.eq(loan_id))
            .order_by_desc(loan_payments::Column::PaidAt)
            .all(self.db())
            .await?;

        Ok(models.into_iter().map(LoanPayment::from).collect())
    }
}
