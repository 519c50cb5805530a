use num::Num;
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ZeroSpVec;

impl<N> Serialize for ZeroSpVec<N>
where
    N: Num + Serialize + Copy,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // シリアライズするフィールドは len, inds, vals
        let mut state = serializer.serialize_struct("ZeroSpVec", 3)?;
        state.serialize_field("len", &(self.len() as u64))?;
        state.serialize_field("inds", self.as_ind_slice())?;
        state.serialize_field("vals", self.as_val_slice())?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for ZeroSpVec<N>
where
    N: Num + Deserialize<'de> + Copy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ZeroSpVecData<N> {
            len: u64,
            inds: Vec<u32>,
            vals: Vec<N>,
        }

        let data = ZeroSpVecData::deserialize(deserializer)?;
        let len = usize::try_from(data.len).map_err(D::Error::custom)?;
        // 壊れたデータは昇順・範囲の検査で弾く
        ZeroSpVec::from_sorted_parts(len, data.inds, data.vals)
            .ok_or_else(|| D::Error::custom("ZeroSpVec indices must be strictly ascending and below len"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_keeps_layout() {
        let v: ZeroSpVec<f64> = ZeroSpVec::from_pairs(10, vec![(7, 0.25), (2, 1.5)]);
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let back: ZeroSpVec<f64> = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.len(), 10);
    }

    #[test]
    fn unsorted_payload_is_rejected() {
        let bad = serde_json::json!({ "len": 4, "inds": [3, 1], "vals": [1.0, 2.0] });
        let parsed: Result<ZeroSpVec<f64>, _> = serde_json::from_value(bad);
        assert!(parsed.is_err());
    }
}
