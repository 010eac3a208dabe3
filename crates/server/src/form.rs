//! # 作成フォームの検証
//!
//! 各フィールドは前後の空白を除いてから検証する。文字数はUnicodeスカラー値で数える。

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use pokenea_types::PokeneaForm;

/// 検証済みの入力。
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPokeneaForm {
    pub nombre: String,
    pub altura: f64,
    pub habilidad: String,
    pub url_imagen: String,
    pub frase: String,
}

/// フィールド名 → エラーメッセージ
pub type FieldErrors = BTreeMap<String, String>;

const ALTURA_RANGE: RangeInclusive<f64> = 0.1..=3.0;

fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    len: RangeInclusive<usize>,
    required: &str,
    length: &str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), required.to_string());
    } else if !len.contains(&value.chars().count()) {
        errors.insert(field.to_string(), length.to_string());
    }
    value.to_string()
}

fn check_altura(errors: &mut FieldErrors, raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert("altura".to_string(), "Altura es requerida".to_string());
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(altura) if altura.is_finite() => {
            if !ALTURA_RANGE.contains(&altura) {
                errors.insert(
                    "altura".to_string(),
                    "La altura debe estar entre 0.1 y 3.0 metros".to_string(),
                );
            }
            altura
        }
        _ => {
            errors.insert(
                "altura".to_string(),
                "La altura debe ser un número válido".to_string(),
            );
            0.0
        }
    }
}

/// フォームを検証する。失敗時は全フィールドのエラーをまとめて返す。
pub fn validate(form: &PokeneaForm) -> Result<ValidPokeneaForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let nombre = check_text(
        &mut errors,
        "nombre",
        &form.nombre,
        3..=50,
        "Nombre es requerido",
        "El nombre debe tener entre 3 y 50 caracteres",
    );
    let altura = check_altura(&mut errors, &form.altura);
    let habilidad = check_text(
        &mut errors,
        "habilidad",
        &form.habilidad,
        3..=100,
        "Habilidad es requerida",
        "La habilidad debe tener entre 3 y 100 caracteres",
    );
    let url_imagen = check_text(
        &mut errors,
        "url_imagen",
        &form.url_imagen,
        10..=200,
        "URL de imagen es requerida",
        "La URL de imagen debe tener entre 10 y 200 caracteres",
    );
    let frase = check_text(
        &mut errors,
        "frase",
        &form.frase,
        10..=500,
        "Frase filosófica es requerida",
        "La frase debe tener entre 10 y 500 caracteres",
    );

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidPokeneaForm {
        nombre,
        altura,
        habilidad,
        url_imagen,
        frase,
    })
}
