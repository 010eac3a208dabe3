//! # Pokeneaレコードストア
//!
//! SQLite（sqlx）上の `pokeneas` テーブルへのアクセス。
//! スキーマは起動時に作成し、空の場合は組み込みのPokeneaを投入する。

use std::str::FromStr;

use pokenea_types::{NewPokenea, Pokenea};
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS pokeneas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL UNIQUE,
    altura REAL NOT NULL,
    habilidad TEXT NOT NULL,
    imagen TEXT NOT NULL UNIQUE,
    frase TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, nombre, altura, habilidad, imagen, frase FROM pokeneas";

/// レコードストアのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 同名のPokeneaが既に存在する
    #[error("Pokenea {0} は既に存在します")]
    Duplicate(String),
    /// データベース操作に失敗
    #[error("データベース操作に失敗: {0}")]
    Database(#[from] sqlx::Error),
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_error) => db_error.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}

fn pokenea_from_row(row: &SqliteRow) -> Pokenea {
    Pokenea {
        id: row.get("id"),
        nombre: row.get("nombre"),
        altura: row.get("altura"),
        habilidad: row.get("habilidad"),
        imagen: row.get("imagen"),
        frase: row.get("frase"),
    }
}

/// `pokeneas` テーブルのリポジトリ。
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// データベースに接続し、スキーマを作成する。
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// テスト用のインメモリデータベース。
    ///
    /// 接続ごとに別のデータベースになるため、接続を1本に固定して閉じないようにする。
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, RepositoryError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM pokeneas")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    /// ランダムなオフセットで1件選ぶ。テーブルが空ならNone。
    pub async fn random(&self) -> Result<Option<Pokenea>, RepositoryError> {
        let count = self.count().await?;
        if count == 0 {
            return Ok(None);
        }
        let offset = rand::thread_rng().gen_range(0..count);

        let row = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id LIMIT 1 OFFSET ?"))
            .bind(offset)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(pokenea_from_row))
    }

    pub async fn get(&self, id: i64) -> Result<Option<Pokenea>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(pokenea_from_row))
    }

    /// 全件をid順で返す。
    pub async fn list(&self) -> Result<Vec<Pokenea>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(pokenea_from_row).collect())
    }

    pub async fn exists_by_name(&self, nombre: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM pokeneas WHERE nombre = ? LIMIT 1")
            .bind(nombre)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// 正規化済みベース名 `base` の画像キー（`{base}.{拡張子}`）を既に使っているか。
    ///
    /// 大文字小文字や空白だけが違う名前は同じキーに保存されるため、
    /// 名前の一致とは別に確認する。
    pub async fn image_base_in_use(&self, base: &str) -> Result<bool, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT 1 FROM pokeneas WHERE imagen IN (");
        let mut separated = builder.separated(", ");
        for ext in pokenea_ingest::SUPPORTED_EXTENSIONS {
            separated.push_bind(format!("{base}.{ext}"));
        }
        builder.push(") LIMIT 1");

        let row = builder.build().fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    /// 1件挿入し、採番されたレコードを返す。名前・画像キーの重複は [`RepositoryError::Duplicate`]。
    pub async fn insert(&self, new: NewPokenea) -> Result<Pokenea, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO pokeneas (nombre, altura, habilidad, imagen, frase)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.nombre)
        .bind(new.altura)
        .bind(&new.habilidad)
        .bind(&new.imagen)
        .bind(&new.frase)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(new.with_id(done.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Duplicate(new.nombre)),
            Err(e) => Err(e.into()),
        }
    }

    /// テーブルが空の場合のみ投入する。投入した件数を返す。
    pub async fn seed(&self, pokeneas: &[NewPokenea]) -> Result<usize, RepositoryError> {
        if self.count().await? > 0 {
            return Ok(0);
        }
        for pokenea in pokeneas {
            self.insert(pokenea.clone()).await?;
        }
        tracing::info!(count = pokeneas.len(), "初期Pokeneaを投入");
        Ok(pokeneas.len())
    }
}

/// 起動時に投入する組み込みのPokenea。
pub fn builtin_pokeneas() -> Vec<NewPokenea> {
    let entries: [(&str, f64, &str, &str, &str); 6] = [
        (
            "Arrierón",
            1.4,
            "Carga infinita",
            "arrieron.png",
            "El que no arriesga un carriel, no gana una mula.",
        ),
        (
            "Silletero",
            1.1,
            "Florecer",
            "silletero.png",
            "Las flores no se cargan, se llevan en el alma.",
        ),
        (
            "Tintico",
            0.3,
            "Despertar",
            "tintico.png",
            "Nadie sabe lo que tiene hasta que se le acaba el café.",
        ),
        (
            "Bandejón",
            0.8,
            "Saciedad",
            "bandejon.png",
            "Barriga llena, corazón contento.",
        ),
        (
            "Metrocable",
            2.9,
            "Vuelo urbano",
            "metrocable.png",
            "Desde arriba todos los barrios se ven iguales.",
        ),
        (
            "Guatapé",
            2.2,
            "Escalar",
            "guatape.png",
            "Son 740 escalones, pero la vista se gana uno a uno.",
        ),
    ];

    entries
        .into_iter()
        .map(|(nombre, altura, habilidad, imagen, frase)| NewPokenea {
            nombre: nombre.to_string(),
            altura,
            habilidad: habilidad.to_string(),
            imagen: imagen.to_string(),
            frase: frase.to_string(),
        })
        .collect()
}
