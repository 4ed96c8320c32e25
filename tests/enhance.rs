use anyhow::{anyhow, Context};
use photo_enhancer::encoded::EncodedImage;
use photo_enhancer::enhance::{
    ContentPart, Enhance, EnhancementClient, EnhancementError, GenerateRequest, GenerateResponse,
    GenerativeTransport, InlineImage, Modality,
};
use photo_enhancer::intake::SourceImage;
use std::sync::Mutex;

struct FnTransport<F>(F);

impl<F> GenerativeTransport for FnTransport<F>
where
    F: Fn(&GenerateRequest) -> anyhow::Result<GenerateResponse> + Send + Sync,
{
    fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        (self.0)(request)
    }
}

fn client<F>(f: F) -> EnhancementClient<FnTransport<F>>
where
    F: Fn(&GenerateRequest) -> anyhow::Result<GenerateResponse> + Send + Sync,
{
    EnhancementClient::new(FnTransport(f))
}

fn jpeg_source() -> SourceImage {
    SourceImage {
        encoded: EncodedImage::from_base64_parts("image/jpeg", "X"),
        media_type: "image/jpeg".into(),
        display_name: "photo.jpg".into(),
    }
}

fn text_part(text: &str) -> ContentPart {
    ContentPart {
        text: Some(text.into()),
        ..Default::default()
    }
}

fn image_part(media_type: &str, data: &str) -> ContentPart {
    ContentPart {
        inline_image: Some(InlineImage {
            data: data.into(),
            media_type: media_type.into(),
        }),
        text: None,
    }
}

#[test]
fn sends_payload_type_and_instruction() {
    let seen = Mutex::new(None);
    let client = client(|req: &GenerateRequest| {
        *seen.lock().unwrap() = Some(req.clone());
        Ok(GenerateResponse {
            parts: vec![image_part("image/png", "QUJD")],
        })
    });
    client.enhance(&jpeg_source(), "Make it pop").unwrap();

    let req = seen.lock().unwrap().clone().unwrap();
    assert_eq!(req.image_payload, "X");
    assert_eq!(req.media_type, "image/jpeg");
    assert_eq!(req.instruction, "Make it pop");
    assert_eq!(req.modalities, vec![Modality::Image, Modality::Text]);
}

#[test]
fn returns_first_inline_image() {
    let client = client(|_: &GenerateRequest| {
        Ok(GenerateResponse {
            parts: vec![
                text_part("Here you go"),
                image_part("image/jpeg", "X"),
                image_part("image/png", "Y"),
            ],
        })
    });
    let result = client.enhance(&jpeg_source(), "anything").unwrap();
    assert_eq!(result.as_str(), "data:image/jpeg;base64,X");
}

#[test]
fn text_only_reply_is_a_refusal() {
    let client = client(|_: &GenerateRequest| {
        Ok(GenerateResponse {
            parts: vec![text_part("I can't help with that.")],
        })
    });
    let err = client.enhance(&jpeg_source(), "anything").unwrap_err();
    assert_eq!(err, EnhancementError::NoImageReturned);
    assert_eq!(
        err.to_string(),
        "AI did not return an image. It might have refused the request."
    );
}

#[test]
fn source_without_payload_is_rejected_before_sending() {
    let calls = Mutex::new(0);
    let client = client(|_: &GenerateRequest| {
        *calls.lock().unwrap() += 1;
        Ok(GenerateResponse::default())
    });
    let source = SourceImage {
        encoded: EncodedImage::from_raw("data:image/png;base64,"),
        media_type: "image/png".into(),
        display_name: "broken.png".into(),
    };
    let err = client.enhance(&source, "anything").unwrap_err();
    assert_eq!(err.to_string(), "Invalid base64 image data");
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn invalid_key_gets_fixed_message() {
    let client = client(|_: &GenerateRequest| {
        Err(anyhow!("API key not valid. Please pass a valid API key.")).context("send request")
    });
    let err = client.enhance(&jpeg_source(), "anything").unwrap_err();
    assert_eq!(err, EnhancementError::InvalidCredential);
    assert_eq!(
        err.to_string(),
        "The provided API key is not valid. Please check your configuration."
    );
}

#[test]
fn other_failures_are_wrapped() {
    let client = client(|_: &GenerateRequest| Err(anyhow!("quota exceeded")));
    let err = client.enhance(&jpeg_source(), "anything").unwrap_err();
    assert_eq!(
        err.to_string(),
        "An error occurred while enhancing the image: quota exceeded"
    );
}

#[test]
fn empty_failure_message_is_unknown() {
    let client = client(|_: &GenerateRequest| Err(anyhow!("")));
    let err = client.enhance(&jpeg_source(), "anything").unwrap_err();
    assert_eq!(err, EnhancementError::Unknown);
    assert_eq!(
        err.to_string(),
        "An unknown error occurred while enhancing the image."
    );
}
