//! 简单的语言检测测试

use dotenvy::dotenv;
use google_translator::Translator;

#[tokio::main]
async fn main() {
    dotenv().ok();

    println!("=== 语言检测测试 ===");

    let translator = Translator::from_env().expect("GOOGLE_API_KEY must be set");

    for text in ["Hello, world!", "Bonjour le monde!", "你好，世界！"] {
        match translator.detect(text).await {
            Ok(language) => println!("✅ {:<20} -> {}", text, language),
            Err(e) => println!("❌ {:<20} -> {}", text, e),
        }
    }

    println!("\n=== 测试完成 ===");
}
