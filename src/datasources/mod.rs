pub mod azure_translator;
pub mod dictionary;
pub mod google_translate;
pub mod openweathermap;
pub mod translation;

pub use azure_translator::AzureTranslatorClient;
pub use dictionary::DictionaryTranslator;
pub use google_translate::GoogleTranslateClient;
pub use openweathermap::OpenWeatherMapClient;
pub use translation::TranslationService;
