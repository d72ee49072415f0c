//! Parameter normalization: raw caller intent in, fully typed parameters out.
//!
//! Every operation has a raw request struct (schema-valid JSON, semantically
//! under-specified) and a normalized parameter struct (fully resolved, ready
//! for the builder). Normalizers delegate all account fallback to the
//! resolver, interpret tri-state key fields through [`KeySpec`], convert
//! display-unit amounts exactly, and collect field violations instead of
//! failing on the first one. Structural checks run before any network call.

mod contract;
mod token;
mod topic;
mod transfer;

pub use contract::{
    normalise_execute_contract, AbiArgInput, ContractCallParams, ExecuteContractRequest, UintInput,
};
pub use token::{
    normalise_airdrop_token, normalise_create_token, normalise_mint_token,
    normalise_token_association, normalise_update_token, AirdropRecipientInput,
    AirdropTokenParams, AirdropTokenRequest, CreateTokenParams, CreateTokenRequest,
    MintTokenParams, MintTokenRequest, TokenAssociationParams, TokenAssociationRequest,
    UpdateTokenParams, UpdateTokenRequest,
};
pub use topic::{
    normalise_create_topic, normalise_delete_topic, normalise_submit_topic_message,
    normalise_update_topic, CreateTopicParams, CreateTopicRequest, DeleteTopicParams,
    DeleteTopicRequest, SubmitTopicMessageParams, SubmitTopicMessageRequest, UpdateTopicParams,
    UpdateTopicRequest,
};
pub use transfer::{
    normalise_transfer_hbar, HbarTransferInput, HbarTransferParams, TransferHbarRequest,
};

use hederakit_core::{
    ExecutionContext, KeyInput, KeySpec, KitError, LedgerClient, PublicKey, ValidationReport,
};

use crate::resolver;

/// Resolve one tri-state key field.
///
/// `Unset` stays absent, `UseDefault` resolves through the account resolver,
/// and malformed explicit material lands in the report under `field`.
pub(crate) async fn resolve_key(
    input: Option<&KeyInput>,
    field: &str,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
    report: &mut ValidationReport,
) -> Result<Option<PublicKey>, KitError> {
    match KeySpec::from_input(input) {
        KeySpec::Unset => Ok(None),
        KeySpec::UseDefault => resolver::default_public_key(context, client).await.map(Some),
        KeySpec::Explicit(material) => match material.parse::<PublicKey>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(error) => {
                report.push(field, error);
                Ok(None)
            }
        },
    }
}
