use rimagen::{
    AspectRatio, EditMode, GenerationOptions, GenerationRequest, ImageClient, MaskMode,
    PromptTemplate, ReferenceSetBuilder, RefinePromptRequest, SafetyFilterLevel, SubjectType,
    TextClient, TryOnClient, TryOnRequest, VertexClient, VertexConfig,
};
use std::collections::HashMap;
use std::env;
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    rimagen::logger::init_with_config(
        rimagen::logger::LoggerConfig::development().with_level(log::Level::Debug),
    )?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    log::info!("🔍 Checking Google Cloud environment...");

    match env::var("GOOGLE_CLOUD_PROJECT") {
        Ok(project) => log::info!("GOOGLE_CLOUD_PROJECT: {}", project),
        Err(_) => {
            log::error!("❌ GOOGLE_CLOUD_PROJECT is not set");
            return Err("GOOGLE_CLOUD_PROJECT is required".into());
        }
    }
    if let Ok(region) = env::var("GOOGLE_CLOUD_REGION") {
        log::info!("GOOGLE_CLOUD_REGION: {}", region);
    } else {
        log::warn!("No GOOGLE_CLOUD_REGION set, using us-central1");
    }
    match env::var("GOOGLE_ACCESS_TOKEN") {
        Ok(token) => log::debug!("Access token length: {}", token.len()),
        Err(_) => {
            log::error!("❌ GOOGLE_ACCESS_TOKEN is not set (try `gcloud auth print-access-token`)");
            return Err("GOOGLE_ACCESS_TOKEN is required".into());
        }
    }

    let config = VertexConfig::from_env();

    log::info!("🔄 Creating Vertex client...");
    let client = match VertexClient::new(config) {
        Ok(client) => {
            log::info!("✅ Vertex client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Vertex client: {}", e);
            return Err(e.into());
        }
    };

    log::info!("🖼️  Available image models:");
    for model in ImageClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }
    for model in TryOnClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }
    for model in TextClient::supported_models() {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }

    // Test 1: template rendering + text-to-image generation
    log::info!("🎨 Testing greeting card generation...");

    let template = PromptTemplate::new(rimagen::prompt::GREETING_CARD_TEMPLATE);
    let fields: HashMap<String, String> = [
        ("card_reason", "birthday"),
        ("tone", "funny"),
        ("image_idea", "a cat wearing a party hat"),
        ("colors", "pastel blue and yellow"),
        ("card_style", "Cartoon"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let card_prompt = template.render(&fields)?;
    log::info!("📝 Prompt sent to the model:\n{}", card_prompt);

    let request = GenerationRequest::assemble(
        client.image().generate_model(),
        card_prompt,
        Vec::new(),
        GenerationOptions::new()
            .with_image_count(4)
            .with_aspect_ratio(AspectRatio::Portrait3x4)
            .with_safety_level(SafetyFilterLevel::BlockOnlyHigh)
            .with_watermark(false),
    )?;

    match client.image().generate(request).await {
        Ok(result) if result.is_empty() => {
            log::warn!("⚠️  The API did not return any generated images");
        }
        Ok(result) => {
            log::info!(
                "✅ {} of {} card image(s) rendered",
                result.succeeded(),
                result.len()
            );
            save_images(&result, "card")?;
        }
        Err(e) => log::error!("❌ Card generation failed: {}", e),
    }

    // Test 2: background swap editing, when a source image is provided
    if let Ok(path) = env::var("SOURCE_IMAGE_PATH") {
        log::info!("🖌️  Testing background swap with {}...", path);
        let source = fs::read(&path)?;

        let references = ReferenceSetBuilder::new()
            .raw_with_id(0, source)
            .mask_by_mode_with_id(1, MaskMode::Background)
            .build()?;

        let request = GenerationRequest::assemble(
            client.image().edit_model(),
            "A sunlit scandinavian living room",
            references,
            GenerationOptions::new()
                .with_image_count(4)
                .with_seed(42)
                .with_edit_mode(EditMode::BackgroundSwap),
        )?;

        match client.image().edit(request).await {
            Ok(result) => {
                log::info!(
                    "✅ {} of {} background variation(s) rendered",
                    result.succeeded(),
                    result.len()
                );
                save_images(&result, "bgswap")?;
            }
            Err(e) => log::error!("❌ Background edit failed: {}", e),
        }
    } else {
        log::info!("💡 Set SOURCE_IMAGE_PATH to test background swap editing");
    }

    // Test 3: Gemini prompt refinement + subject-conditioned editing
    if let Ok(path) = env::var("SUBJECT_IMAGE_PATH") {
        log::info!("✨ Testing prompt refinement with {}...", path);
        let subject = fs::read(&path)?;

        let refinement = RefinePromptRequest::new(
            "A lifestyle shot of [1] on a marble countertop.",
        )
        .with_subject_image(subject.clone(), "image/png");

        match client.text().refine_prompt(refinement).await {
            Ok(refined) => {
                log::info!("📝 Refined prompt:\n{}", refined);

                let references = ReferenceSetBuilder::new()
                    .subject_with_id(1, subject, "the uploaded product", SubjectType::Product)
                    .build()?;
                let request = GenerationRequest::assemble(
                    client.image().edit_model(),
                    refined,
                    references,
                    GenerationOptions::new()
                        .with_image_count(4)
                        .with_safety_level(SafetyFilterLevel::BlockOnlyHigh)
                        .with_edit_mode(EditMode::Default),
                )?;

                match client.image().edit(request).await {
                    Ok(result) => {
                        log::info!(
                            "✅ {} of {} customization(s) rendered",
                            result.succeeded(),
                            result.len()
                        );
                        save_images(&result, "subject")?;
                    }
                    Err(e) => log::error!("❌ Subject customization failed: {}", e),
                }
            }
            Err(e) => log::error!("❌ Prompt refinement failed: {}", e),
        }
    } else {
        log::info!("💡 Set SUBJECT_IMAGE_PATH to test prompt refinement and customization");
    }

    // Test 4: virtual try-on, when both images are provided
    match (env::var("PERSON_IMAGE_PATH"), env::var("PRODUCT_IMAGE_PATH")) {
        (Ok(person_path), Ok(product_path)) => {
            log::info!("👕 Testing virtual try-on...");
            let person = fs::read(&person_path)?;
            let product = fs::read(&product_path)?;

            let request = TryOnRequest::new(person, product)
                .with_sample_count(1)
                .with_base_steps(25);

            match client.try_on().try_on(request).await {
                Ok(result) if result.is_empty() => {
                    log::warn!("⚠️  The API did not return any try-on images");
                }
                Ok(result) => {
                    log::info!(
                        "✅ {} of {} try-on image(s) rendered",
                        result.succeeded(),
                        result.len()
                    );
                    save_images(&result, "tryon")?;
                }
                Err(e) => log::error!("❌ Virtual try-on failed: {}", e),
            }
        }
        _ => log::info!("💡 Set PERSON_IMAGE_PATH and PRODUCT_IMAGE_PATH to test try-on"),
    }

    log::info!("🎉 All tests completed!");
    Ok(())
}

fn save_images(
    result: &rimagen::GenerationResult,
    prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    for (i, image) in result.iter().enumerate() {
        match image.bytes() {
            Some(bytes) => {
                let filename = format!(
                    "{}_{}_{}.png",
                    prefix,
                    chrono::Utc::now().timestamp(),
                    i + 1
                );
                fs::write(&filename, bytes)?;
                log::info!("💾 Image saved to: {}", filename);
            }
            None => {
                log::warn!(
                    "⚠️  Could not retrieve image data for {}: {}",
                    i + 1,
                    image.failure().unwrap_or("unknown")
                );
            }
        }
    }
    Ok(())
}
