use serde::Deserialize;

/// The JSON object a search page embeds inside each metadata node. Only the
/// keys we read are listed; anything else in the payload is ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MetadataPayload {
    #[serde(rename = "ou")]
    pub url: String,
    #[serde(rename = "oh")]
    pub height: u32,
    #[serde(rename = "ow")]
    pub width: u32,
    #[serde(rename = "ity")]
    pub kind: String,
    #[serde(rename = "pt")]
    pub title: String,
    #[serde(rename = "s")]
    pub description: String,
}

/// One image search result, in the shape written to the output document.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "Height")]
    pub height: u32,
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl ResultRecord {
    pub fn new(
        url: String,
        height: u32,
        width: u32,
        kind: String,
        title: String,
        description: String,
    ) -> ResultRecord {
        ResultRecord {
            title,
            description,
            url,
            height,
            width,
            kind,
        }
    }

    /// Drop every non-ASCII character from url, title and description.
    /// `kind` is left alone.
    pub fn into_ascii(self) -> ResultRecord {
        ResultRecord {
            url: ascii_only(&self.url),
            title: ascii_only(&self.title),
            description: ascii_only(&self.description),
            ..self
        }
    }
}

impl From<MetadataPayload> for ResultRecord {
    fn from(payload: MetadataPayload) -> Self {
        ResultRecord::new(
            payload.url,
            payload.height,
            payload.width,
            payload.kind,
            payload.title,
            payload.description,
        )
    }
}

fn ascii_only(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}
