pub mod builders;
pub mod merge;
pub mod nodes;

pub use builders::build_offer_catalog_node;
pub use merge::{deep_merge, resolve_organization};
pub use nodes::{build_faq_page, build_offer_node, build_product_node, build_webpage_node};

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::{GraphOverrides, SchemaContext, SchemaError};

/// Closed set of supported schema types. Dispatch always goes through this
/// enum; raw strings are validated exactly once, at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    PaymentCard,
    LoanOrCredit,
    BankAccount,
    PaymentService,
    InvestmentOrDeposit,
    InsuranceAgency,
    FinancialProduct,
    BlogPosting,
}

impl SchemaType {
    pub const ALL: [SchemaType; 8] = [
        SchemaType::PaymentCard,
        SchemaType::LoanOrCredit,
        SchemaType::BankAccount,
        SchemaType::PaymentService,
        SchemaType::InvestmentOrDeposit,
        SchemaType::InsuranceAgency,
        SchemaType::FinancialProduct,
        SchemaType::BlogPosting,
    ];

    /// Canonical snake-case key of this schema type.
    pub fn key(&self) -> &'static str {
        match self {
            SchemaType::PaymentCard => "payment_card",
            SchemaType::LoanOrCredit => "loan_or_credit",
            SchemaType::BankAccount => "bank_account",
            SchemaType::PaymentService => "payment_service",
            SchemaType::InvestmentOrDeposit => "investment_or_deposit",
            SchemaType::InsuranceAgency => "insurance_agency",
            SchemaType::FinancialProduct => "financial_product",
            SchemaType::BlogPosting => "blog_posting",
        }
    }

    /// Parses a raw schema-type string, folding camelCase and hyphenated
    /// spellings to the canonical key. Unknown keys are a hard error.
    pub fn parse(input: &str) -> Result<Self, SchemaError> {
        match canonical_key(input).as_str() {
            "payment_card" => Ok(SchemaType::PaymentCard),
            "loan_or_credit" => Ok(SchemaType::LoanOrCredit),
            "bank_account" => Ok(SchemaType::BankAccount),
            "payment_service" => Ok(SchemaType::PaymentService),
            "investment_or_deposit" => Ok(SchemaType::InvestmentOrDeposit),
            "insurance_agency" => Ok(SchemaType::InsuranceAgency),
            "financial_product" => Ok(SchemaType::FinancialProduct),
            "blog_posting" => Ok(SchemaType::BlogPosting),
            _ => Err(SchemaError::UnknownSchemaType(input.to_string())),
        }
    }

    /// Builds the ordered node list for this schema type.
    pub fn build_graph(self, ctx: &SchemaContext, overrides: &GraphOverrides) -> Vec<Value> {
        match self {
            SchemaType::PaymentCard => builders::build_payment_card_graph(ctx, overrides),
            SchemaType::LoanOrCredit => builders::build_loan_or_credit_graph(ctx, overrides),
            SchemaType::BankAccount => builders::build_bank_account_graph(ctx, overrides),
            SchemaType::PaymentService => builders::build_payment_service_graph(ctx, overrides),
            SchemaType::InvestmentOrDeposit => {
                builders::build_investment_or_deposit_graph(ctx, overrides)
            }
            SchemaType::InsuranceAgency => builders::build_insurance_agency_graph(ctx, overrides),
            SchemaType::FinancialProduct => builders::build_financial_product_graph(ctx, overrides),
            SchemaType::BlogPosting => builders::build_blog_posting_graph(ctx, overrides),
        }
    }
}

impl FromStr for SchemaType {
    type Err = SchemaError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        SchemaType::parse(input)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Folds a raw schema-type spelling to the snake-case registry key: an
/// underscore is inserted before every interior uppercase letter, hyphens
/// become underscores, the result is lowercased and trimmed.
fn canonical_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len() + 4);
    for (index, ch) in raw.trim().chars().enumerate() {
        if ch == '-' {
            key.push('_');
        } else if ch.is_uppercase() {
            if index > 0 {
                key.push('_');
            }
            for lower in ch.to_lowercase() {
                key.push(lower);
            }
        } else {
            key.push(ch);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_and_hyphens_fold_to_snake_case() {
        assert_eq!(canonical_key("LoanOrCredit"), "loan_or_credit");
        assert_eq!(canonical_key("payment-card"), "payment_card");
        assert_eq!(canonical_key(" blog_posting "), "blog_posting");
    }

    #[test]
    fn every_spelling_resolves_to_the_same_variant() {
        for (spelling, expected) in [
            ("PaymentCard", SchemaType::PaymentCard),
            ("loan_or_credit", SchemaType::LoanOrCredit),
            ("LoanOrCredit", SchemaType::LoanOrCredit),
            ("bank-account", SchemaType::BankAccount),
            ("InvestmentOrDeposit", SchemaType::InvestmentOrDeposit),
        ] {
            assert_eq!(SchemaType::parse(spelling).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_schema_type_is_a_hard_error() {
        let error = SchemaType::parse("unknown_type").unwrap_err();
        assert!(matches!(error, SchemaError::UnknownSchemaType(_)));
        assert!(error.to_string().contains("unknown_type"));
    }

    #[test]
    fn keys_round_trip_through_parse() {
        for schema_type in SchemaType::ALL {
            assert_eq!(SchemaType::parse(schema_type.key()).unwrap(), schema_type);
        }
    }
}
