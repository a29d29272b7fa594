use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;

/// `GET /tracks/{id}` body as sent by the server, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub audio_url: String,
    pub video_url: Option<String>,
    pub duration: Option<f64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TrackPayload {
    pub fn from_json(raw: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    pub fn validate(self) -> Result<TrackMetadata, ValidationError> {
        let id = match self.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Null) | None => return Err(ValidationError::MissingId),
            Some(other) => {
                return Err(ValidationError::Malformed(format!("unexpected id {other}")));
            }
        };

        let audio_url =
            non_blank(self.audio_url).ok_or_else(|| ValidationError::MissingAudio(id.clone()))?;

        Ok(TrackMetadata {
            title: non_blank(self.title).unwrap_or_else(|| "Untitled".to_string()),
            artist: non_blank(self.artist_name).unwrap_or_default(),
            cover_url: non_blank(self.cover_image_url),
            video_url: non_blank(self.video_url),
            duration: self.duration.filter(|d| d.is_finite() && *d > 0.0),
            audio_url,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_accepted() {
        let track = TrackPayload::from_json(r#"{"id":17,"audio_url":"/u/a.mp3","duration":12.5}"#)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(track.id, "17");
        assert_eq!(track.title, "Untitled");
        assert_eq!(track.duration, Some(12.5));
    }

    #[test]
    fn blank_audio_location_cannot_play() {
        let payload = TrackPayload::from_json(r#"{"id":"abc","title":"T","audio_url":"  "}"#).unwrap();
        assert_eq!(
            payload.validate(),
            Err(ValidationError::MissingAudio("abc".into()))
        );
    }

    #[test]
    fn wrongly_typed_fields_are_malformed() {
        assert!(matches!(
            TrackPayload::from_json(r#"{"id":"abc","audio_url":42}"#),
            Err(ValidationError::Malformed(_))
        ));
        assert!(matches!(
            TrackPayload::from_json(r#"{"id":["abc"],"audio_url":"/a.mp3"}"#)
                .unwrap()
                .validate(),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn missing_id_is_rejected() {
        let payload = TrackPayload::from_json(r#"{"audio_url":"/a.mp3"}"#).unwrap();
        assert_eq!(payload.validate(), Err(ValidationError::MissingId));
    }
}
