//! The label-to-field rule tables.
//!
//! Keywords are written in normalized label form (lowercase words separated by
//! single spaces). A keyword with surrounding spaces, such as `" box 1 "`, only
//! matches whole words because labels are padded with one space on each side.

use crate::models::{CanonicalField, DocumentType};

use CanonicalField as F;
use DocumentType as D;

/// Priority of a label that already is a canonical field name.
pub const EXACT_NAME_PRIORITY: u8 = 20;

/// One keyword rule: every keyword must occur in the normalized label.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    /// Substrings that must all be present.
    pub keywords: &'static [&'static str],
    /// The field the rule maps to.
    pub field: CanonicalField,
    /// Higher wins; ties go to the earlier rule.
    pub priority: u8,
    /// When set, the rule only applies to documents of this type.
    pub scope: Option<DocumentType>,
}

impl MappingRule {
    /// True if the rule applies to `document_type` and every keyword occurs in `label`.
    pub fn matches(&self, label: &str, document_type: DocumentType) -> bool {
        self.scope.is_none_or(|scope| scope == document_type)
            && self.keywords.iter().all(|keyword| label.contains(keyword))
    }
}

const fn any(keywords: &'static [&'static str], field: CanonicalField, priority: u8) -> MappingRule {
    MappingRule {
        keywords,
        field,
        priority,
        scope: None,
    }
}

const fn on(
    scope: DocumentType,
    keywords: &'static [&'static str],
    field: CanonicalField,
    priority: u8,
) -> MappingRule {
    MappingRule {
        keywords,
        field,
        priority,
        scope: Some(scope),
    }
}

/// Official box numbers, scoped to the form they belong to.
const BOX: u8 = 15;
/// Taxpayer and payer identifiers; above box numbers so that
/// "Box a Employee's social security number" never reads as wages.
const IDENTIFIER: u8 = 16;
/// Full official box caption.
const PHRASE: u8 = 14;
/// One distinctive keyword.
const STRONG: u8 = 12;
/// Short keyword combinations.
const COMBO: u8 = 11;
/// Common informal variants.
const VARIANT: u8 = 10;
/// Generic terms that only make sense on one form.
const SCOPED_TERM: u8 = 9;

/// The ordered mapping table.
pub static MAPPING_RULES: &[MappingRule] = &[
    // Identifiers
    any(&["payer", " tin "], F::PayerTin, IDENTIFIER),
    any(&["payer", " ein "], F::PayerTin, IDENTIFIER),
    any(&["payer", "identification number"], F::PayerTin, IDENTIFIER),
    any(&["recipient", " tin "], F::RecipientTin, IDENTIFIER),
    any(&["recipient", "identification number"], F::RecipientTin, IDENTIFIER),
    any(&["social security number"], F::EmployeeSsn, IDENTIFIER),
    any(&[" ssn "], F::EmployeeSsn, IDENTIFIER),
    any(&["employer identification number"], F::EmployerEin, IDENTIFIER),
    any(&[" ein "], F::EmployerEin, IDENTIFIER),
    // W-2 boxes
    on(D::W2, &[" box 1 "], F::Wages, BOX),
    on(D::W2, &[" box 2 "], F::FederalIncomeTaxWithheld, BOX),
    on(D::W2, &[" box 3 "], F::SocialSecurityWages, BOX),
    on(D::W2, &[" box 4 "], F::SocialSecurityTaxWithheld, BOX),
    on(D::W2, &[" box 5 "], F::MedicareWages, BOX),
    on(D::W2, &[" box 6 "], F::MedicareTaxWithheld, BOX),
    on(D::W2, &[" box 7 "], F::SocialSecurityTips, BOX),
    on(D::W2, &[" box 8 "], F::AllocatedTips, BOX),
    on(D::W2, &[" box 10 "], F::DependentCareBenefits, BOX),
    on(D::W2, &[" box 11 "], F::NonqualifiedPlans, BOX),
    on(D::W2, &[" box 16 "], F::StateWages, BOX),
    on(D::W2, &[" box 17 "], F::StateIncomeTaxWithheld, BOX),
    on(D::W2, &[" box 19 "], F::LocalIncomeTaxWithheld, BOX),
    // 1099-NEC boxes
    on(D::Form1099Nec, &[" box 1 "], F::NonemployeeCompensation, BOX),
    on(D::Form1099Nec, &[" box 4 "], F::FederalIncomeTaxWithheld, BOX),
    // 1099-MISC boxes
    on(D::Form1099Misc, &[" box 1 "], F::Rents, BOX),
    on(D::Form1099Misc, &[" box 2 "], F::Royalties, BOX),
    on(D::Form1099Misc, &[" box 3 "], F::OtherIncome, BOX),
    on(D::Form1099Misc, &[" box 4 "], F::FederalIncomeTaxWithheld, BOX),
    on(D::Form1099Misc, &[" box 5 "], F::FishingBoatProceeds, BOX),
    on(D::Form1099Misc, &[" box 6 "], F::MedicalPayments, BOX),
    on(D::Form1099Misc, &[" box 7 "], F::DirectSales, BOX),
    on(D::Form1099Misc, &[" box 8 "], F::SubstitutePayments, BOX),
    on(D::Form1099Misc, &[" box 9 "], F::CropInsuranceProceeds, BOX),
    on(D::Form1099Misc, &[" box 10 "], F::GrossProceedsAttorney, BOX),
    on(D::Form1099Misc, &[" box 11 "], F::FishPurchasedForResale, BOX),
    on(D::Form1099Misc, &[" box 12 "], F::Section409aDeferrals, BOX),
    on(D::Form1099Misc, &[" box 14 "], F::ExcessParachutePayments, BOX),
    on(D::Form1099Misc, &[" box 15 "], F::NonqualifiedDeferredComp, BOX),
    // 1099-INT boxes
    on(D::Form1099Int, &[" box 1 "], F::InterestIncome, BOX),
    on(D::Form1099Int, &[" box 2 "], F::EarlyWithdrawalPenalty, BOX),
    on(D::Form1099Int, &[" box 3 "], F::UsSavingsBondInterest, BOX),
    on(D::Form1099Int, &[" box 4 "], F::FederalIncomeTaxWithheld, BOX),
    on(D::Form1099Int, &[" box 6 "], F::ForeignTaxPaid, BOX),
    on(D::Form1099Int, &[" box 8 "], F::TaxExemptInterest, BOX),
    // 1099-DIV boxes
    on(D::Form1099Div, &[" box 1a "], F::DividendIncome, BOX),
    on(D::Form1099Div, &[" box 1b "], F::QualifiedDividends, BOX),
    on(D::Form1099Div, &[" box 2a "], F::CapitalGainDistributions, BOX),
    on(D::Form1099Div, &[" box 3 "], F::NondividendDistributions, BOX),
    on(D::Form1099Div, &[" box 4 "], F::FederalIncomeTaxWithheld, BOX),
    on(D::Form1099Div, &[" box 5 "], F::Section199aDividends, BOX),
    on(D::Form1099Div, &[" box 7 "], F::ForeignTaxPaid, BOX),
    on(D::Form1099Div, &[" box 12 "], F::ExemptInterestDividends, BOX),
    // 1099-B boxes
    on(D::Form1099B, &[" box 1d "], F::Proceeds, BOX),
    on(D::Form1099B, &[" box 1e "], F::CostBasis, BOX),
    on(D::Form1099B, &[" box 1g "], F::WashSaleLossDisallowed, BOX),
    on(D::Form1099B, &[" box 4 "], F::FederalIncomeTaxWithheld, BOX),
    // Official captions
    any(&["wages tips other"], F::Wages, PHRASE),
    any(&["federal income tax withheld"], F::FederalIncomeTaxWithheld, PHRASE),
    any(&["social security wages"], F::SocialSecurityWages, PHRASE),
    any(&["social security tax withheld"], F::SocialSecurityTaxWithheld, PHRASE),
    any(&["social security tips"], F::SocialSecurityTips, PHRASE),
    any(&["medicare wages"], F::MedicareWages, PHRASE),
    any(&["medicare tax withheld"], F::MedicareTaxWithheld, PHRASE),
    any(&["allocated tips"], F::AllocatedTips, PHRASE),
    any(&["dependent care benefits"], F::DependentCareBenefits, PHRASE),
    any(&["nonqualified plans"], F::NonqualifiedPlans, PHRASE),
    any(&["state wages"], F::StateWages, PHRASE),
    any(&["state income tax"], F::StateIncomeTaxWithheld, PHRASE),
    any(&["local income tax"], F::LocalIncomeTaxWithheld, PHRASE),
    any(&["nonemployee compensation"], F::NonemployeeCompensation, PHRASE),
    any(&["other income"], F::OtherIncome, PHRASE),
    any(&["fishing boat proceeds"], F::FishingBoatProceeds, PHRASE),
    any(&["medical and health care payments"], F::MedicalPayments, PHRASE),
    any(&["direct sales"], F::DirectSales, PHRASE),
    any(&["substitute payments"], F::SubstitutePayments, PHRASE),
    any(&["crop insurance proceeds"], F::CropInsuranceProceeds, PHRASE),
    any(&["fish purchased for resale"], F::FishPurchasedForResale, PHRASE),
    any(&["section 409a deferrals"], F::Section409aDeferrals, PHRASE),
    any(&["nonqualified deferred compensation"], F::NonqualifiedDeferredComp, PHRASE),
    any(&["interest income"], F::InterestIncome, PHRASE),
    any(&["early withdrawal penalty"], F::EarlyWithdrawalPenalty, PHRASE),
    any(&["foreign tax paid"], F::ForeignTaxPaid, PHRASE),
    any(&["tax exempt interest"], F::TaxExemptInterest, PHRASE),
    any(&["exempt interest dividends"], F::ExemptInterestDividends, PHRASE),
    any(&["total ordinary dividends"], F::DividendIncome, PHRASE),
    any(&["qualified dividends"], F::QualifiedDividends, PHRASE),
    any(&["capital gain distr"], F::CapitalGainDistributions, PHRASE),
    any(&["nondividend distributions"], F::NondividendDistributions, PHRASE),
    any(&["section 199a dividends"], F::Section199aDividends, PHRASE),
    any(&["cost or other basis"], F::CostBasis, PHRASE),
    any(&["wash sale loss disallowed"], F::WashSaleLossDisallowed, PHRASE),
    any(&["gain or loss"], F::CapitalGains, PHRASE),
    // Strong single keywords
    any(&[" wages "], F::Wages, STRONG),
    any(&["nonemployee"], F::NonemployeeCompensation, STRONG),
    any(&[" rents "], F::Rents, STRONG),
    any(&[" royalties "], F::Royalties, STRONG),
    any(&["attorney"], F::GrossProceedsAttorney, STRONG),
    any(&["parachute"], F::ExcessParachutePayments, STRONG),
    any(&["savings bond"], F::UsSavingsBondInterest, STRONG),
    any(&["409a"], F::Section409aDeferrals, STRONG),
    any(&["199a"], F::Section199aDividends, STRONG),
    any(&["wash sale"], F::WashSaleLossDisallowed, STRONG),
    any(&["nondividend"], F::NondividendDistributions, STRONG),
    // Short combinations
    any(&["federal", "withheld"], F::FederalIncomeTaxWithheld, COMBO),
    any(&["federal", " tax "], F::FederalIncomeTaxWithheld, COMBO),
    any(&["social security", "withheld"], F::SocialSecurityTaxWithheld, COMBO),
    any(&["social security", " tax "], F::SocialSecurityTaxWithheld, COMBO),
    any(&["medicare", "withheld"], F::MedicareTaxWithheld, COMBO),
    any(&["medicare", " tax "], F::MedicareTaxWithheld, COMBO),
    any(&["state", "withheld"], F::StateIncomeTaxWithheld, COMBO),
    any(&["local", "withheld"], F::LocalIncomeTaxWithheld, COMBO),
    any(&["dependent care"], F::DependentCareBenefits, COMBO),
    any(&["medical", "payments"], F::MedicalPayments, COMBO),
    any(&["crop insurance"], F::CropInsuranceProceeds, COMBO),
    any(&["fishing boat"], F::FishingBoatProceeds, COMBO),
    any(&["deferred comp"], F::NonqualifiedDeferredComp, COMBO),
    any(&["early withdrawal"], F::EarlyWithdrawalPenalty, COMBO),
    any(&["foreign tax"], F::ForeignTaxPaid, COMBO),
    any(&["ordinary dividends"], F::DividendIncome, COMBO),
    any(&["cost basis"], F::CostBasis, COMBO),
    any(&["gross proceeds"], F::Proceeds, COMBO),
    // Common variants
    any(&[" nec "], F::NonemployeeCompensation, VARIANT),
    any(&[" salary "], F::Wages, VARIANT),
    any(&[" salaries "], F::Wages, VARIANT),
    any(&[" rent "], F::Rents, VARIANT),
    any(&[" royalty "], F::Royalties, VARIANT),
    any(&[" interest "], F::InterestIncome, VARIANT),
    any(&[" dividends "], F::DividendIncome, VARIANT),
    any(&["dividend income"], F::DividendIncome, VARIANT),
    any(&["capital gain"], F::CapitalGains, VARIANT),
    // Form-specific generic terms
    on(D::W2, &["compensation"], F::Wages, SCOPED_TERM),
    on(D::Form1099Nec, &["compensation"], F::NonemployeeCompensation, SCOPED_TERM),
    on(D::Form1099Misc, &[" income "], F::OtherIncome, SCOPED_TERM),
    on(D::Form1099Int, &[" income "], F::InterestIncome, SCOPED_TERM),
    on(D::Form1099Div, &["ordinary"], F::DividendIncome, SCOPED_TERM),
    on(D::Form1099B, &["proceeds"], F::Proceeds, SCOPED_TERM),
    on(D::Form1099B, &["basis"], F::CostBasis, SCOPED_TERM),
    on(D::Form1099B, &[" gain "], F::CapitalGains, SCOPED_TERM),
];

/// A loose rule tried only when no [`MappingRule`] matched.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    /// Substrings that must all be present.
    pub required: &'static [&'static str],
    /// Substrings that disqualify the label.
    pub excluded: &'static [&'static str],
    /// The field the rule maps to.
    pub field: CanonicalField,
}

impl FallbackRule {
    /// True if every required word and no excluded word occurs in `label`.
    pub fn matches(&self, label: &str) -> bool {
        self.required.iter().all(|word| label.contains(word))
            && !self.excluded.iter().any(|word| label.contains(word))
    }
}

const fn fallback(
    required: &'static [&'static str],
    excluded: &'static [&'static str],
    field: CanonicalField,
) -> FallbackRule {
    FallbackRule {
        required,
        excluded,
        field,
    }
}

/// Fallback heuristics, first match wins.
pub static FALLBACK_RULES: &[FallbackRule] = &[
    fallback(
        &["wage"],
        &["box", "gross", "statement", "form", "social", "medicare", "state"],
        F::Wages,
    ),
    fallback(&["federal", "tax"], &[], F::FederalIncomeTaxWithheld),
    fallback(&["social", "tax"], &[], F::SocialSecurityTaxWithheld),
    fallback(&["social", "wage"], &[], F::SocialSecurityWages),
    fallback(&["medicare", "tax"], &[], F::MedicareTaxWithheld),
    fallback(&["medicare", "wage"], &[], F::MedicareWages),
    fallback(&["state"], &["wage"], F::StateIncomeTaxWithheld),
    fallback(&["nonemployee"], &[], F::NonemployeeCompensation),
    fallback(&["nec"], &[], F::NonemployeeCompensation),
    fallback(&["interest"], &[], F::InterestIncome),
    fallback(&["dividend"], &[], F::DividendIncome),
    fallback(&["capital"], &[], F::CapitalGains),
    fallback(&["gain"], &[], F::CapitalGains),
];
