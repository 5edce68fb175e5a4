pub mod analysis_panel;
pub mod emotion_card;
