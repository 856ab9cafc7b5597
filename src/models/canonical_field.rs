//! The canonical field vocabulary shared by extraction and computation.
//!
//! Every extraction path (OCR, regex, LLM) must resolve its labels to one of these
//! names before aggregation. Each income field is tied to exactly one box on one form,
//! which is what keeps income from different sources from being conflated.

use serde::{Deserialize, Serialize};

use super::DocumentType;

/// How a canonical field participates in the tax computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Income that counts toward total income.
    TaxableIncome,
    /// Taxable income that is also subject to self-employment tax.
    SelfEmploymentIncome,
    /// Tax withheld at source.
    Withholding,
    /// Reported on a form but never added to total income (non-taxable or a
    /// subset of another box).
    Informational,
    /// A taxpayer or payer identifier; a string, never an amount.
    Identifier,
}

/// A canonical tax-data key.
///
/// # Example
///
/// ```
/// use tax_engine::models::{CanonicalField, FieldKind};
///
/// assert_eq!(CanonicalField::Wages.as_str(), "wages");
/// assert_eq!(CanonicalField::from_name("medical_payments"), Some(CanonicalField::MedicalPayments));
/// assert_eq!(CanonicalField::MedicalPayments.kind(), FieldKind::Informational);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    // W-2
    /// W-2 Box 1: wages, tips, other compensation.
    Wages,
    /// Federal income tax withheld (W-2 Box 2, 1099 Box 4).
    FederalIncomeTaxWithheld,
    /// W-2 Box 3.
    SocialSecurityWages,
    /// W-2 Box 4.
    SocialSecurityTaxWithheld,
    /// W-2 Box 5.
    MedicareWages,
    /// W-2 Box 6.
    MedicareTaxWithheld,
    /// W-2 Box 7.
    SocialSecurityTips,
    /// W-2 Box 8.
    AllocatedTips,
    /// W-2 Box 10.
    DependentCareBenefits,
    /// W-2 Box 11.
    NonqualifiedPlans,
    /// W-2 Box 16.
    StateWages,
    /// W-2 Box 17.
    StateIncomeTaxWithheld,
    /// W-2 Box 19.
    LocalIncomeTaxWithheld,

    // 1099-NEC
    /// 1099-NEC Box 1.
    NonemployeeCompensation,

    // 1099-MISC
    /// 1099-MISC Box 1.
    Rents,
    /// 1099-MISC Box 2.
    Royalties,
    /// 1099-MISC Box 3. Not subject to self-employment tax.
    OtherIncome,
    /// 1099-MISC Box 5.
    FishingBoatProceeds,
    /// 1099-MISC Box 6. Not taxable to the recipient.
    MedicalPayments,
    /// 1099-MISC Box 7 direct sales indicator.
    DirectSales,
    /// 1099-MISC Box 8.
    SubstitutePayments,
    /// 1099-MISC Box 9.
    CropInsuranceProceeds,
    /// 1099-MISC Box 10.
    GrossProceedsAttorney,
    /// 1099-MISC Box 11.
    FishPurchasedForResale,
    /// 1099-MISC Box 12.
    #[serde(rename = "section_409a_deferrals")]
    Section409aDeferrals,
    /// 1099-MISC Box 14.
    ExcessParachutePayments,
    /// 1099-MISC Box 15.
    NonqualifiedDeferredComp,

    // 1099-INT
    /// 1099-INT Box 1.
    InterestIncome,
    /// 1099-INT Box 2.
    EarlyWithdrawalPenalty,
    /// 1099-INT Box 3.
    UsSavingsBondInterest,
    /// 1099-INT Box 6.
    ForeignTaxPaid,
    /// 1099-INT Box 8.
    TaxExemptInterest,

    // 1099-DIV
    /// 1099-DIV Box 1a: total ordinary dividends.
    DividendIncome,
    /// 1099-DIV Box 1b. A subset of Box 1a.
    QualifiedDividends,
    /// 1099-DIV Box 2a.
    CapitalGainDistributions,
    /// 1099-DIV Box 3.
    NondividendDistributions,
    /// 1099-DIV Box 5. A subset of Box 1a.
    #[serde(rename = "section_199a_dividends")]
    Section199aDividends,
    /// 1099-DIV Box 12.
    ExemptInterestDividends,

    // 1099-B
    /// 1099-B Box 1d.
    Proceeds,
    /// 1099-B Box 1e.
    CostBasis,
    /// 1099-B Box 1g.
    WashSaleLossDisallowed,
    /// 1099-B net gain reported for the year.
    CapitalGains,

    // Identifiers
    /// Employer identification number (W-2 Box b).
    EmployerEin,
    /// Employee social security number (W-2 Box a).
    EmployeeSsn,
    /// Payer TIN on a 1099.
    PayerTin,
    /// Recipient TIN on a 1099.
    RecipientTin,
}

impl CanonicalField {
    /// Every canonical field, in declaration order.
    pub const ALL: [CanonicalField; 46] = [
        Self::Wages,
        Self::FederalIncomeTaxWithheld,
        Self::SocialSecurityWages,
        Self::SocialSecurityTaxWithheld,
        Self::MedicareWages,
        Self::MedicareTaxWithheld,
        Self::SocialSecurityTips,
        Self::AllocatedTips,
        Self::DependentCareBenefits,
        Self::NonqualifiedPlans,
        Self::StateWages,
        Self::StateIncomeTaxWithheld,
        Self::LocalIncomeTaxWithheld,
        Self::NonemployeeCompensation,
        Self::Rents,
        Self::Royalties,
        Self::OtherIncome,
        Self::FishingBoatProceeds,
        Self::MedicalPayments,
        Self::DirectSales,
        Self::SubstitutePayments,
        Self::CropInsuranceProceeds,
        Self::GrossProceedsAttorney,
        Self::FishPurchasedForResale,
        Self::Section409aDeferrals,
        Self::ExcessParachutePayments,
        Self::NonqualifiedDeferredComp,
        Self::InterestIncome,
        Self::EarlyWithdrawalPenalty,
        Self::UsSavingsBondInterest,
        Self::ForeignTaxPaid,
        Self::TaxExemptInterest,
        Self::DividendIncome,
        Self::QualifiedDividends,
        Self::CapitalGainDistributions,
        Self::NondividendDistributions,
        Self::Section199aDividends,
        Self::ExemptInterestDividends,
        Self::Proceeds,
        Self::CostBasis,
        Self::WashSaleLossDisallowed,
        Self::CapitalGains,
        Self::EmployerEin,
        Self::EmployeeSsn,
        Self::PayerTin,
        Self::RecipientTin,
    ];

    /// The wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wages => "wages",
            Self::FederalIncomeTaxWithheld => "federal_income_tax_withheld",
            Self::SocialSecurityWages => "social_security_wages",
            Self::SocialSecurityTaxWithheld => "social_security_tax_withheld",
            Self::MedicareWages => "medicare_wages",
            Self::MedicareTaxWithheld => "medicare_tax_withheld",
            Self::SocialSecurityTips => "social_security_tips",
            Self::AllocatedTips => "allocated_tips",
            Self::DependentCareBenefits => "dependent_care_benefits",
            Self::NonqualifiedPlans => "nonqualified_plans",
            Self::StateWages => "state_wages",
            Self::StateIncomeTaxWithheld => "state_income_tax_withheld",
            Self::LocalIncomeTaxWithheld => "local_income_tax_withheld",
            Self::NonemployeeCompensation => "nonemployee_compensation",
            Self::Rents => "rents",
            Self::Royalties => "royalties",
            Self::OtherIncome => "other_income",
            Self::FishingBoatProceeds => "fishing_boat_proceeds",
            Self::MedicalPayments => "medical_payments",
            Self::DirectSales => "direct_sales",
            Self::SubstitutePayments => "substitute_payments",
            Self::CropInsuranceProceeds => "crop_insurance_proceeds",
            Self::GrossProceedsAttorney => "gross_proceeds_attorney",
            Self::FishPurchasedForResale => "fish_purchased_for_resale",
            Self::Section409aDeferrals => "section_409a_deferrals",
            Self::ExcessParachutePayments => "excess_parachute_payments",
            Self::NonqualifiedDeferredComp => "nonqualified_deferred_comp",
            Self::InterestIncome => "interest_income",
            Self::EarlyWithdrawalPenalty => "early_withdrawal_penalty",
            Self::UsSavingsBondInterest => "us_savings_bond_interest",
            Self::ForeignTaxPaid => "foreign_tax_paid",
            Self::TaxExemptInterest => "tax_exempt_interest",
            Self::DividendIncome => "dividend_income",
            Self::QualifiedDividends => "qualified_dividends",
            Self::CapitalGainDistributions => "capital_gain_distributions",
            Self::NondividendDistributions => "nondividend_distributions",
            Self::Section199aDividends => "section_199a_dividends",
            Self::ExemptInterestDividends => "exempt_interest_dividends",
            Self::Proceeds => "proceeds",
            Self::CostBasis => "cost_basis",
            Self::WashSaleLossDisallowed => "wash_sale_loss_disallowed",
            Self::CapitalGains => "capital_gains",
            Self::EmployerEin => "employer_ein",
            Self::EmployeeSsn => "employee_ssn",
            Self::PayerTin => "payer_tin",
            Self::RecipientTin => "recipient_tin",
        }
    }

    /// Looks up a field by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// How the field participates in the computation.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Wages
            | Self::Rents
            | Self::Royalties
            | Self::OtherIncome
            | Self::SubstitutePayments
            | Self::CropInsuranceProceeds
            | Self::GrossProceedsAttorney
            | Self::ExcessParachutePayments
            | Self::NonqualifiedDeferredComp
            | Self::InterestIncome
            | Self::UsSavingsBondInterest
            | Self::DividendIncome
            | Self::CapitalGainDistributions
            | Self::CapitalGains => FieldKind::TaxableIncome,

            Self::NonemployeeCompensation | Self::FishingBoatProceeds => {
                FieldKind::SelfEmploymentIncome
            }

            Self::FederalIncomeTaxWithheld
            | Self::SocialSecurityTaxWithheld
            | Self::MedicareTaxWithheld => FieldKind::Withholding,

            Self::EmployerEin | Self::EmployeeSsn | Self::PayerTin | Self::RecipientTin => {
                FieldKind::Identifier
            }

            // State and local withholding are carried for display; state tax is out of scope.
            _ => FieldKind::Informational,
        }
    }

    /// True when the field is added into total income.
    pub fn is_taxable_income(self) -> bool {
        matches!(
            self.kind(),
            FieldKind::TaxableIncome | FieldKind::SelfEmploymentIncome
        )
    }

    /// True for every field that carries an amount rather than an identifier.
    pub fn is_amount(self) -> bool {
        self.kind() != FieldKind::Identifier
    }

    /// The form the field is reported on. `None` for fields that appear on several
    /// forms (federal withholding, identifiers).
    pub fn source_form(self) -> Option<DocumentType> {
        match self {
            Self::FederalIncomeTaxWithheld
            | Self::EmployerEin
            | Self::EmployeeSsn
            | Self::PayerTin
            | Self::RecipientTin => None,

            Self::Wages
            | Self::SocialSecurityWages
            | Self::SocialSecurityTaxWithheld
            | Self::MedicareWages
            | Self::MedicareTaxWithheld
            | Self::SocialSecurityTips
            | Self::AllocatedTips
            | Self::DependentCareBenefits
            | Self::NonqualifiedPlans
            | Self::StateWages
            | Self::StateIncomeTaxWithheld
            | Self::LocalIncomeTaxWithheld => Some(DocumentType::W2),

            Self::NonemployeeCompensation => Some(DocumentType::Form1099Nec),

            Self::Rents
            | Self::Royalties
            | Self::OtherIncome
            | Self::FishingBoatProceeds
            | Self::MedicalPayments
            | Self::DirectSales
            | Self::SubstitutePayments
            | Self::CropInsuranceProceeds
            | Self::GrossProceedsAttorney
            | Self::FishPurchasedForResale
            | Self::Section409aDeferrals
            | Self::ExcessParachutePayments
            | Self::NonqualifiedDeferredComp => Some(DocumentType::Form1099Misc),

            Self::InterestIncome
            | Self::EarlyWithdrawalPenalty
            | Self::UsSavingsBondInterest
            | Self::ForeignTaxPaid
            | Self::TaxExemptInterest => Some(DocumentType::Form1099Int),

            Self::DividendIncome
            | Self::QualifiedDividends
            | Self::CapitalGainDistributions
            | Self::NondividendDistributions
            | Self::Section199aDividends
            | Self::ExemptInterestDividends => Some(DocumentType::Form1099Div),

            Self::Proceeds | Self::CostBasis | Self::WashSaleLossDisallowed | Self::CapitalGains => {
                Some(DocumentType::Form1099B)
            }
        }
    }

    /// Iterates over the fields that carry amounts.
    pub fn amounts() -> impl Iterator<Item = CanonicalField> {
        Self::ALL.into_iter().filter(|field| field.is_amount())
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_wire_names_are_unique() {
        let names: HashSet<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names.len(), CanonicalField::ALL.len());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for field in CanonicalField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
            let back: CanonicalField = serde_json::from_str(&json).unwrap();
            assert_eq!(back, field);
        }
    }

    #[test]
    fn test_from_name_round_trips_every_field() {
        for field in CanonicalField::ALL {
            assert_eq!(CanonicalField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(CanonicalField::from_name("gross_pay"), None);
    }

    #[test]
    fn test_only_nec_and_fishing_are_self_employment() {
        let se: Vec<CanonicalField> = CanonicalField::ALL
            .into_iter()
            .filter(|f| f.kind() == FieldKind::SelfEmploymentIncome)
            .collect();
        assert_eq!(
            se,
            vec![
                CanonicalField::NonemployeeCompensation,
                CanonicalField::FishingBoatProceeds
            ]
        );
    }

    #[test]
    fn test_other_income_is_taxable_but_not_self_employment() {
        assert_eq!(CanonicalField::OtherIncome.kind(), FieldKind::TaxableIncome);
        assert!(CanonicalField::OtherIncome.is_taxable_income());
    }

    #[test]
    fn test_non_taxable_boxes_are_excluded_from_income() {
        for field in [
            CanonicalField::MedicalPayments,
            CanonicalField::DirectSales,
            CanonicalField::FishPurchasedForResale,
            CanonicalField::QualifiedDividends,
            CanonicalField::TaxExemptInterest,
            CanonicalField::SocialSecurityWages,
        ] {
            assert!(!field.is_taxable_income(), "{field} must not be income");
        }
    }

    #[test]
    fn test_identifiers_are_not_amounts() {
        assert!(!CanonicalField::EmployerEin.is_amount());
        assert!(CanonicalField::amounts().all(|f| f.kind() != FieldKind::Identifier));
        assert_eq!(CanonicalField::amounts().count(), 42);
    }

    #[test]
    fn test_income_fields_have_single_source_form() {
        for field in CanonicalField::ALL {
            if field.is_taxable_income() {
                assert!(field.source_form().is_some(), "{field} has no source form");
            }
        }
    }
}
