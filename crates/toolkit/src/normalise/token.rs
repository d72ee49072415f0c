use rust_decimal::Decimal;
use serde::Deserialize;

use hederakit_core::{
    to_smallest_units, AccountId, ExecutionContext, KeyInput, KitError, LedgerClient, TokenId,
    TokenKeys, TokenTransfer, TokenType, ValidationReport,
};

use crate::resolver;

use super::resolve_key;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub token_name: String,
    pub token_symbol: String,
    #[serde(default)]
    pub token_type: Option<TokenType>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub initial_supply: Option<Decimal>,
    #[serde(default)]
    pub treasury_account_id: Option<String>,
    #[serde(default)]
    pub token_memo: Option<String>,
    #[serde(default)]
    pub admin_key: Option<KeyInput>,
    #[serde(default)]
    pub kyc_key: Option<KeyInput>,
    #[serde(default)]
    pub freeze_key: Option<KeyInput>,
    #[serde(default)]
    pub wipe_key: Option<KeyInput>,
    #[serde(default)]
    pub supply_key: Option<KeyInput>,
    #[serde(default)]
    pub pause_key: Option<KeyInput>,
    #[serde(default)]
    pub fee_schedule_key: Option<KeyInput>,
    #[serde(default)]
    pub metadata_key: Option<KeyInput>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTokenParams {
    pub name: String,
    pub symbol: String,
    pub token_type: TokenType,
    pub decimals: u32,
    pub initial_supply: i64,
    pub treasury_account_id: AccountId,
    pub keys: TokenKeys,
    pub memo: Option<String>,
}

pub async fn normalise_create_token(
    raw: &CreateTokenRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<CreateTokenParams, KitError> {
    let mut report = ValidationReport::new();

    if raw.token_name.trim().is_empty() {
        report.push("tokenName", "missing required value");
    }
    if raw.token_symbol.trim().is_empty() {
        report.push("tokenSymbol", "missing required value");
    }

    let token_type = raw.token_type.unwrap_or(TokenType::Fungible);

    let decimals = match token_type {
        TokenType::Fungible => raw.decimals.unwrap_or(0),
        TokenType::NonFungible => {
            if raw.decimals.is_some_and(|d| d > 0) {
                report.push("decimals", "non-fungible tokens cannot have decimals");
            }
            0
        }
    };

    let initial_supply = match token_type {
        TokenType::Fungible => {
            let supply = raw.initial_supply.unwrap_or(Decimal::ZERO);
            if supply < Decimal::ZERO {
                report.push("initialSupply", "must not be negative");
                0
            } else {
                match to_smallest_units(supply, decimals) {
                    Ok(units) => units,
                    Err(error) => {
                        report.push("initialSupply", error);
                        0
                    }
                }
            }
        }
        TokenType::NonFungible => {
            if raw.initial_supply.is_some_and(|s| !s.is_zero()) {
                report.push("initialSupply", "non-fungible tokens are minted, not pre-supplied");
            }
            0
        }
    };

    let treasury_account_id = match &raw.treasury_account_id {
        Some(provided) => match provided.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push("treasuryAccountId", error);
                None
            }
        },
        None => Some(resolver::default_account(context, client)?),
    };

    let mut keys = TokenKeys {
        admin_key: resolve_key(raw.admin_key.as_ref(), "adminKey", context, client, &mut report)
            .await?,
        kyc_key: resolve_key(raw.kyc_key.as_ref(), "kycKey", context, client, &mut report).await?,
        freeze_key: resolve_key(raw.freeze_key.as_ref(), "freezeKey", context, client, &mut report)
            .await?,
        wipe_key: resolve_key(raw.wipe_key.as_ref(), "wipeKey", context, client, &mut report)
            .await?,
        supply_key: resolve_key(raw.supply_key.as_ref(), "supplyKey", context, client, &mut report)
            .await?,
        pause_key: resolve_key(raw.pause_key.as_ref(), "pauseKey", context, client, &mut report)
            .await?,
        fee_schedule_key: resolve_key(
            raw.fee_schedule_key.as_ref(),
            "feeScheduleKey",
            context,
            client,
            &mut report,
        )
        .await?,
        metadata_key: resolve_key(
            raw.metadata_key.as_ref(),
            "metadataKey",
            context,
            client,
            &mut report,
        )
        .await?,
    };

    // A non-fungible collection is unusable without a supply key, so creation
    // defaults it to the caller's key.
    if token_type == TokenType::NonFungible && keys.supply_key.is_none() {
        keys.supply_key = Some(resolver::default_public_key(context, client).await?);
    }

    report.into_result()?;

    Ok(CreateTokenParams {
        name: raw.token_name.trim().to_string(),
        symbol: raw.token_symbol.trim().to_string(),
        token_type,
        decimals,
        initial_supply,
        treasury_account_id: treasury_account_id.expect("treasury resolved when report is clean"),
        keys,
        memo: raw.token_memo.clone(),
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenRequest {
    pub token_id: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub token_memo: Option<String>,
    #[serde(default)]
    pub treasury_account_id: Option<String>,
    #[serde(default)]
    pub admin_key: Option<KeyInput>,
    #[serde(default)]
    pub kyc_key: Option<KeyInput>,
    #[serde(default)]
    pub freeze_key: Option<KeyInput>,
    #[serde(default)]
    pub wipe_key: Option<KeyInput>,
    #[serde(default)]
    pub supply_key: Option<KeyInput>,
    #[serde(default)]
    pub pause_key: Option<KeyInput>,
    #[serde(default)]
    pub fee_schedule_key: Option<KeyInput>,
    #[serde(default)]
    pub metadata_key: Option<KeyInput>,
}

/// Update parameters carry only what the caller touched. An omitted field
/// must never reappear here with a default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTokenParams {
    pub token_id: TokenId,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub memo: Option<String>,
    pub treasury_account_id: Option<AccountId>,
    pub keys: TokenKeys,
}

pub async fn normalise_update_token(
    raw: &UpdateTokenRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<UpdateTokenParams, KitError> {
    let mut report = ValidationReport::new();

    let token_id = match raw.token_id.parse::<TokenId>() {
        Ok(id) => Some(id),
        Err(error) => {
            report.push("tokenId", error);
            None
        }
    };

    let treasury_account_id = match &raw.treasury_account_id {
        Some(provided) => match provided.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push("treasuryAccountId", error);
                None
            }
        },
        None => None,
    };

    let keys = TokenKeys {
        admin_key: resolve_key(raw.admin_key.as_ref(), "adminKey", context, client, &mut report)
            .await?,
        kyc_key: resolve_key(raw.kyc_key.as_ref(), "kycKey", context, client, &mut report).await?,
        freeze_key: resolve_key(raw.freeze_key.as_ref(), "freezeKey", context, client, &mut report)
            .await?,
        wipe_key: resolve_key(raw.wipe_key.as_ref(), "wipeKey", context, client, &mut report)
            .await?,
        supply_key: resolve_key(raw.supply_key.as_ref(), "supplyKey", context, client, &mut report)
            .await?,
        pause_key: resolve_key(raw.pause_key.as_ref(), "pauseKey", context, client, &mut report)
            .await?,
        fee_schedule_key: resolve_key(
            raw.fee_schedule_key.as_ref(),
            "feeScheduleKey",
            context,
            client,
            &mut report,
        )
        .await?,
        metadata_key: resolve_key(
            raw.metadata_key.as_ref(),
            "metadataKey",
            context,
            client,
            &mut report,
        )
        .await?,
    };

    report.into_result()?;
    Ok(UpdateTokenParams {
        token_id: token_id.expect("token id parsed when report is clean"),
        name: raw.token_name.clone(),
        symbol: raw.token_symbol.clone(),
        memo: raw.token_memo.clone(),
        treasury_account_id,
        keys,
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintTokenRequest {
    pub token_id: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub metadata: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintTokenParams {
    pub token_id: TokenId,
    pub amount: i64,
    pub metadata: Vec<Vec<u8>>,
}

pub async fn normalise_mint_token(
    raw: &MintTokenRequest,
    context: &ExecutionContext,
) -> Result<MintTokenParams, KitError> {
    let token_id = raw.token_id.parse::<TokenId>().map_err(|error| {
        let mut report = ValidationReport::new();
        report.push("tokenId", error);
        report.into_result().unwrap_err()
    })?;

    // Which field is required depends on the token's kind, so the lookup
    // happens before amount validation.
    let info = context.query.get_token_info(&token_id).await?;
    let mut report = ValidationReport::new();

    let (amount, metadata) = match info.token_type {
        TokenType::Fungible => {
            if raw.metadata.as_ref().is_some_and(|m| !m.is_empty()) {
                report.push("metadata", "only non-fungible tokens take mint metadata");
            }
            let amount = match raw.amount {
                None => {
                    report.push("amount", "a positive amount is required");
                    0
                }
                Some(amount) if amount <= Decimal::ZERO => {
                    report.push("amount", format!("Invalid mint amount: {amount}"));
                    0
                }
                Some(amount) => match to_smallest_units(amount, info.decimals) {
                    Ok(units) => units,
                    Err(error) => {
                        report.push("amount", error);
                        0
                    }
                },
            };
            (amount, Vec::new())
        }
        TokenType::NonFungible => {
            if raw.amount.is_some() {
                report.push("amount", "non-fungible mints are driven by metadata, not amount");
            }
            let metadata: Vec<Vec<u8>> = raw
                .metadata
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(String::into_bytes)
                .collect();
            if metadata.is_empty() {
                report.push("metadata", "at least one metadata entry is required");
            }
            (0, metadata)
        }
    };

    report.finish(MintTokenParams { token_id, amount, metadata })
}

/// Shared raw shape for associate and dissociate.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAssociationRequest {
    #[serde(default)]
    pub account_id: Option<String>,
    pub token_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAssociationParams {
    pub account_id: AccountId,
    pub token_ids: Vec<TokenId>,
}

pub async fn normalise_token_association(
    raw: &TokenAssociationRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<TokenAssociationParams, KitError> {
    let mut report = ValidationReport::new();

    if raw.token_ids.is_empty() {
        report.push("tokenIds", "at least one token id is required");
    }

    let mut token_ids = Vec::with_capacity(raw.token_ids.len());
    for (index, token_id) in raw.token_ids.iter().enumerate() {
        match token_id.parse::<TokenId>() {
            Ok(id) => token_ids.push(id),
            Err(error) => report.push(format!("tokenIds[{index}]"), error),
        }
    }

    let account_id = match &raw.account_id {
        Some(provided) => match provided.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push("accountId", error);
                None
            }
        },
        None => Some(resolver::default_account(context, client)?),
    };

    report.into_result()?;
    Ok(TokenAssociationParams {
        account_id: account_id.expect("account resolved when report is clean"),
        token_ids,
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropTokenRequest {
    pub token_id: String,
    pub recipients: Vec<AirdropRecipientInput>,
    #[serde(default)]
    pub source_account_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRecipientInput {
    pub account_id: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirdropTokenParams {
    pub token_id: TokenId,
    pub sender_id: AccountId,
    pub transfers: Vec<TokenTransfer>,
}

pub async fn normalise_airdrop_token(
    raw: &AirdropTokenRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<AirdropTokenParams, KitError> {
    let mut report = ValidationReport::new();

    let token_id = match raw.token_id.parse::<TokenId>() {
        Ok(id) => Some(id),
        Err(error) => {
            report.push("tokenId", error);
            None
        }
    };

    if raw.recipients.is_empty() {
        report.push("recipients", "at least one recipient is required");
    }

    let mut recipients = Vec::with_capacity(raw.recipients.len());
    for (index, recipient) in raw.recipients.iter().enumerate() {
        let account = match recipient.account_id.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push(format!("recipients[{index}].accountId"), error);
                None
            }
        };
        if recipient.amount <= Decimal::ZERO {
            report.push(
                format!("recipients[{index}].amount"),
                format!("Invalid transfer amount: {}", recipient.amount),
            );
            continue;
        }
        if let Some(account_id) = account {
            recipients.push((account_id, recipient.amount));
        }
    }

    let sender_id = match &raw.source_account_id {
        Some(provided) => match provided.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push("sourceAccountId", error);
                None
            }
        },
        None => Some(resolver::default_account(context, client)?),
    };

    report.into_result()?;
    let token_id = token_id.expect("token id parsed when report is clean");
    let sender_id = sender_id.expect("sender resolved when report is clean");

    let info = context.query.get_token_info(&token_id).await?;
    if info.token_type == TokenType::NonFungible {
        return Err(KitError::validation(format!(
            "token {token_id} is non-fungible; airdrop moves fungible amounts only"
        )));
    }

    let mut report = ValidationReport::new();
    let mut transfers = Vec::with_capacity(recipients.len());
    for (index, (account_id, amount)) in recipients.into_iter().enumerate() {
        match to_smallest_units(amount, info.decimals) {
            Ok(units) => transfers.push(TokenTransfer { account_id, amount: units }),
            Err(error) => report.push(format!("recipients[{index}].amount"), error),
        }
    }

    report.finish(AirdropTokenParams { token_id, sender_id, transfers })
}
