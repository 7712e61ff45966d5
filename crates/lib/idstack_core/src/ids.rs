//! Deterministic physical identifiers.
//!
//! Every id is derived from (stack, region, kind, logical id) with a
//! name-based UUIDv5, so re-running the pipeline on the same record yields
//! the same ids. Shapes mirror what the identity provider hands out.

use uuid::Uuid;

use crate::models::ResourceKind;

/// Namespace for all idstack name-based UUIDs.
const NAMESPACE: Uuid = Uuid::from_u128(0x6b1d_3c2e_9f4a_5d07_8e21_c4a9_03f6_b7d8);

/// IAM role names are capped at 64 characters.
const MAX_ROLE_NAME_LEN: usize = 64;

/// Hex digits of the disambiguating suffix on truncated role names.
const ROLE_SUFFIX_LEN: usize = 8;

/// Inputs shared by every id generated for one stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSeed<'a> {
    pub stack: &'a str,
    pub region: &'a str,
}

impl<'a> IdSeed<'a> {
    pub fn new(stack: &'a str, region: &'a str) -> Self {
        Self { stack, region }
    }

    fn uuid(&self, kind: ResourceKind, logical_id: &str) -> Uuid {
        let name = format!("{}/{}/{}/{}", self.stack, self.region, kind, logical_id);
        Uuid::new_v5(&NAMESPACE, name.as_bytes())
    }

    /// `<region>_<9 chars>`
    pub fn directory_id(&self, logical_id: &str) -> String {
        let simple = self.uuid(ResourceKind::Directory, logical_id).simple().to_string();
        format!("{}_{}", self.region, &simple[..9])
    }

    /// 26 lowercase alphanumerics.
    pub fn client_id(&self, logical_id: &str) -> String {
        let simple = self.uuid(ResourceKind::Client, logical_id).simple().to_string();
        simple[..26].to_string()
    }

    /// `<region>:<uuid>`
    pub fn federation_id(&self, logical_id: &str) -> String {
        let id = self.uuid(ResourceKind::Federation, logical_id);
        format!("{}:{}", self.region, id.hyphenated())
    }

    /// `<stack>-<logical id>`. Names over the limit are cut on a char
    /// boundary and suffixed with a hash of the logical id.
    pub fn role_name(&self, logical_id: &str) -> String {
        let name = format!("{}-{}", self.stack, logical_id);
        if name.len() <= MAX_ROLE_NAME_LEN {
            return name;
        }

        let mut cut = MAX_ROLE_NAME_LEN - ROLE_SUFFIX_LEN - 1;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        let hash = self.uuid(ResourceKind::Role, logical_id).simple().to_string();
        format!("{}-{}", &name[..cut], &hash[..ROLE_SUFFIX_LEN])
    }

    /// Issuer name under which a directory is registered with a federation.
    pub fn provider_name(&self, directory_id: &str) -> String {
        format!("cognito-idp.{}.amazonaws.com/{}", self.region, directory_id)
    }

    pub fn hosted_ui_url(&self, prefix: &str) -> String {
        format!("https://{}.auth.{}.amazoncognito.com", prefix, self.region)
    }
}
