//! Locale endpoints.

use appliance_core::{Language, LanguageList, LocaleInfo, TranslationCategory, Translations};
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::cache::{QueryKey, Resource, Tag, TagId};
use crate::error::ClientResult;

const R: Resource = Resource::Locale;

/// `POST /locale/change` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleChange {
    #[serde(default)]
    pub success: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub message: String,
}

impl ApiClient {
    /// `POST /locale/change?lang=..`; stales every locale query.
    pub async fn change_locale(&self, language: Language) -> ClientResult<LocaleChange> {
        let query = [("lang".to_string(), language.code().to_string())];
        let call = self.http().post("/locale/change", &query, None::<&()>);
        self.mutate("change locale", call, vec![Tag::whole(R)]).await
    }

    /// `GET /locale/current`
    pub async fn current_locale(&self) -> ClientResult<LocaleInfo> {
        self.read(QueryKey::new("/locale/current"), |_| vec![Tag::whole(R)])
            .await
    }

    /// `GET /locale/translations/{category}`
    pub async fn translations(&self, category: TranslationCategory) -> ClientResult<Translations> {
        let key = QueryKey::new(format!("/locale/translations/{}", category.as_str()));
        self.read(key, |_| vec![Tag::new(R, TagId::Name(category.as_str().to_string()))])
            .await
    }

    /// `GET /locale/languages`
    pub async fn languages(&self) -> ClientResult<LanguageList> {
        self.read(QueryKey::new("/locale/languages"), |_| vec![Tag::whole(R)])
            .await
    }
}
