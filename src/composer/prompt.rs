use crate::constants::messages::NOT_FOUND;
use crate::data::market::{MarketRecord, MarketSnapshot};

/// Prefix of the line that carries the user's question
pub const QUESTION_LABEL: &str = "1. Kullanıcı Sorusu: ";

/// Builds the instruction prompt for one question against one snapshot.
///
/// Deterministic: the same question and snapshot always give the same text.
pub fn build_prompt(user_query: &str, market_data: &MarketSnapshot) -> String {
    format!(
        r#"Giriş Bilgileri:
{label}"{query}"
2. Piyasa Verileri (JSON formatında): {data}

Talimat:
1. Kullanıcının sorusundan hangi piyasa verisini istediğini anla. Bunun için hem 'Kod' (örn: 'VIX') hem de 'Aciklama' (örn: 'INDEX VIX INDEX') alanlarını dikkate al.
2. Piyasa Verileri listesinde, kullanıcının istediği veriye karşılık gelen JSON nesnesini bul.
3. Bulduğun bu nesnenin **mevcut olan tüm alanlarını (Sira_No, Tarih, Saat, Kod, Aciklama, Son_Fiyat, Yuzde_Degisim)** eksiksiz bir şekilde, her bir bilgiyi yeni bir satıra yazarak listele.
4. Cevabını "İstediğiniz [Veri Adı] verisinin bilgileri:" şeklinde bir başlıkla başlat. Veri adı olarak 'Kod' ve 'Aciklama' alanını kullan ve 'Kod > Açıklama' formatında belirt.
5. Eğer istenen bilgi verilerde yoksa, "{not_found}" de.
6. Ekstra yorum veya açıklama yapma.

Örnek Çıktı Formatı:
{example}
"#,
        label = QUESTION_LABEL,
        query = user_query,
        data = market_data.to_prompt_json(),
        not_found = NOT_FOUND,
        example = MarketRecord::sample().render(),
    )
}
