//! 레독스 흐름전지(RFB) 화학계별 균등화 자본비 계산 라이브러리.
//! 핵심 비용 모델은 I/O 없이 순수 함수로 두고, CSV 로드·출력·GUI는 바깥 계층에서 다룬다.

pub mod app;
pub mod application;
pub mod chemistry;
pub mod config;
pub mod constants;
pub mod cost_model;
pub mod dataset;
pub mod i18n;
pub mod report;
pub mod ui_cli;
