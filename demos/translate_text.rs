//! 简单的翻译测试

use dotenvy::dotenv;
use google_translator::{TranslationCache, Translator, TranslatorConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let api_key = std::env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set");

    println!("=== 简单翻译测试 ===");

    let config = TranslatorConfig::builder(api_key)
        .target_lang("zh")
        .build()
        .expect("valid configuration");

    let cache = TranslationCache::from_env();
    println!("缓存文件: {}", cache.path().display());

    let translator = Translator::new(config)
        .expect("client construction")
        .with_cache(cache);

    let text = "Hello, world!";
    println!("\n原文: {}", text);

    match translator.translate(text).await {
        Ok(Some(translation)) => {
            println!("译文: {}", translation);
            println!("\n✅ 翻译成功！");
        }
        Ok(None) => {
            println!("\n❌ 服务未返回译文");
        }
        Err(e) => {
            println!("\n❌ 翻译失败: {}", e);
        }
    }

    if let Err(e) = translator.flush_cache().await {
        println!("❌ 缓存写入失败: {}", e);
    }

    println!("\n=== 测试完成 ===");
}
