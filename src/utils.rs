use crate::data::RowMajorMatrix;
use crate::errors::SensorError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), SensorError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), SensorError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(SensorError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

fn create_parent_dir(path: &Path) -> Result<(), SensorError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| SensorError::Persistence(format!("{}: {}", dir.display(), e)))?;
        }
    }
    Ok(())
}

/// Serialize `data` as YAML at `path`, creating parent directories as needed.
pub fn write_yaml_file<P: AsRef<Path>, T: Serialize>(path: P, data: &T) -> Result<(), SensorError> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    let yaml = serde_yaml::to_string(data).map_err(|e| SensorError::Persistence(e.to_string()))?;
    fs::write(path, yaml).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))
}

pub fn read_yaml_file<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, SensorError> {
    let path = path.as_ref();
    let yaml =
        fs::read_to_string(path).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))?;
    serde_yaml::from_str(&yaml).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))
}

/// Serialize `obj` as JSON at `path`, creating parent directories as needed.
pub fn save_object<P: AsRef<Path>, T: Serialize>(path: P, obj: &T) -> Result<(), SensorError> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    let json = serde_json::to_string(obj).map_err(|e| SensorError::Persistence(e.to_string()))?;
    fs::write(path, json).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))
}

/// Load an object written by [`save_object`].
/// A path that does not exist gives [`SensorError::ModelNotFound`].
pub fn load_object<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T, SensorError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SensorError::ModelNotFound(path.display().to_string()));
    }
    let json =
        fs::read_to_string(path).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))
}

/// Save a feature/target array.
pub fn save_array_data<P: AsRef<Path>>(path: P, array: &RowMajorMatrix<f64>) -> Result<(), SensorError> {
    save_object(path, array)
}

/// Load a feature/target array written by [`save_array_data`].
pub fn load_array_data<P: AsRef<Path>>(path: P) -> Result<RowMajorMatrix<f64>, SensorError> {
    let path = path.as_ref();
    let array: RowMajorMatrix<f64> = load_object(path).map_err(|e| match e {
        SensorError::ModelNotFound(p) => SensorError::DataAccess(format!("array file {} does not exist", p)),
        e => e,
    })?;
    if array.data.len() != array.rows * array.cols {
        return Err(SensorError::DataAccess(format!(
            "array in {} holds {} values, expected {} x {}",
            path.display(),
            array.data.len(),
            array.rows,
            array.cols
        )));
    }
    Ok(array)
}
